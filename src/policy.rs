//! Strictness policy
//!
//! Maps the overall [`Judgment`] for a candidate template to a pass/fail
//! decision. Which verdicts pass depends on the strictness [`Mode`]:
//!
//! | Mode          | Acceptable verdicts           |
//! |---------------|-------------------------------|
//! | `production`  | Same, Newer                   |
//! | `development` | Same, Newer, Older, Mixed     |

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::compatibility::{Judgment, Verdict};
use crate::error::CompatError;

/// Strictness mode for a verification run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Mode {
    /// Work in progress; anything short of incompatible passes
    #[default]
    Development,
    /// Release gate; only unchanged or purely additive templates pass
    Production,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Development => "development",
            Mode::Production => "production",
        }
    }

    /// Verdicts this mode accepts when no override is configured
    pub fn default_acceptable(self) -> &'static [Verdict] {
        match self {
            Mode::Development => &[Verdict::Same, Verdict::Newer, Verdict::Older, Verdict::Mixed],
            Mode::Production => &[Verdict::Same, Verdict::Newer],
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = CompatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" => Ok(Mode::Development),
            "production" => Ok(Mode::Production),
            _ => Err(CompatError::UnknownMode(s.to_string())),
        }
    }
}

impl TryFrom<String> for Mode {
    type Error = CompatError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Produces the overall judgment for a candidate template against a baseline.
///
/// Parsing and field-by-field comparison live behind this trait; failures to
/// read either template are reported through `Error`, never as a judgment.
pub trait SchemaDiffer {
    /// Parsed template representation
    type Schema: ?Sized;
    /// Parse or shape failure
    type Error;

    fn diff(&self, baseline: &Self::Schema, candidate: &Self::Schema) -> Result<Judgment, Self::Error>;
}

/// Outcome of checking one candidate template
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Evaluation {
    /// Whether the verdict is in the mode's acceptable set
    pub accepted: bool,
    pub mode: Mode,
    pub judgment: Judgment,
}

impl Evaluation {
    pub fn into_parts(self) -> (bool, Judgment) {
        (self.accepted, self.judgment)
    }
}

/// Acceptable verdict sets for both modes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Policy {
    development: BTreeSet<Verdict>,
    production: BTreeSet<Verdict>,
}

impl Policy {
    /// Policy with the default acceptable sets
    pub fn new() -> Self {
        Self {
            development: Mode::Development.default_acceptable().iter().copied().collect(),
            production: Mode::Production.default_acceptable().iter().copied().collect(),
        }
    }

    /// Replace the acceptable set for `mode`
    pub fn with_acceptable(mut self, mode: Mode, verdicts: impl IntoIterator<Item = Verdict>) -> Self {
        let verdicts: BTreeSet<Verdict> = verdicts.into_iter().collect();
        match mode {
            Mode::Development => self.development = verdicts,
            Mode::Production => self.production = verdicts,
        }
        self
    }

    pub fn acceptable(&self, mode: Mode) -> &BTreeSet<Verdict> {
        match mode {
            Mode::Development => &self.development,
            Mode::Production => &self.production,
        }
    }

    pub fn accepts(&self, mode: Mode, verdict: Verdict) -> bool {
        self.acceptable(mode).contains(&verdict)
    }

    /// Apply the policy to an already computed judgment
    pub fn judge(&self, judgment: Judgment, mode: Mode) -> Evaluation {
        let accepted = self.accepts(mode, judgment.verdict());
        tracing::debug!(
            mode = %mode,
            verdict = %judgment.verdict(),
            reasons = judgment.reasons().len(),
            accepted,
            "policy decision"
        );
        Evaluation {
            accepted,
            mode,
            judgment,
        }
    }

    /// Diff `candidate` against `baseline` and apply the policy
    pub fn evaluate<D>(
        &self,
        differ: &D,
        baseline: &D::Schema,
        candidate: &D::Schema,
        mode: Mode,
    ) -> Result<Evaluation, D::Error>
    where
        D: SchemaDiffer + ?Sized,
    {
        let judgment = differ.diff(baseline, candidate)?;
        Ok(self.judge(judgment, mode))
    }
}

impl Default for Policy {
    fn default() -> Self {
        Self::new()
    }
}

/// Check `candidate` against `baseline` under the default acceptable sets
pub fn evaluate<D>(
    differ: &D,
    baseline: &D::Schema,
    candidate: &D::Schema,
    mode: Mode,
) -> Result<Evaluation, D::Error>
where
    D: SchemaDiffer + ?Sized,
{
    Policy::default().evaluate(differ, baseline, candidate, mode)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Returns a fixed judgment unless both sides are identical
    struct Scripted(Judgment);

    impl SchemaDiffer for Scripted {
        type Schema = str;
        type Error = String;

        fn diff(&self, baseline: &str, candidate: &str) -> Result<Judgment, String> {
            if baseline.is_empty() || candidate.is_empty() {
                return Err("empty template".to_string());
            }
            if baseline == candidate {
                Ok(Judgment::same())
            } else {
                Ok(self.0.clone())
            }
        }
    }

    #[test]
    fn test_identical_templates_pass_production() {
        let differ = Scripted(Judgment::incompatible("unused"));
        let (accepted, judgment) = evaluate(&differ, "S", "S", Mode::Production)
            .unwrap()
            .into_parts();

        assert!(accepted);
        assert_eq!(judgment.verdict(), Verdict::Same);
    }

    #[test]
    fn test_older_depends_on_mode() {
        let differ = Scripted(Judgment::older("block 'F' removed"));

        let production = evaluate(&differ, "with F", "without F", Mode::Production).unwrap();
        assert!(!production.accepted);
        assert_eq!(production.judgment.verdict(), Verdict::Older);

        let development = evaluate(&differ, "with F", "without F", Mode::Development).unwrap();
        assert!(development.accepted);
        assert_eq!(development.judgment.verdict(), Verdict::Older);
    }

    #[test]
    fn test_mixed_depends_on_mode() {
        let mixed = Judgment::newer("A added").combine(&Judgment::older("B removed"));
        let differ = Scripted(mixed);

        let development = evaluate(&differ, "base", "cand", Mode::Development).unwrap();
        assert!(development.accepted);
        assert_eq!(development.judgment.reasons(), ["A added", "B removed"]);

        let production = evaluate(&differ, "base", "cand", Mode::Production).unwrap();
        assert!(!production.accepted);
        assert_eq!(production.judgment.verdict(), Verdict::Mixed);
    }

    #[test]
    fn test_incompatible_rejected_everywhere() {
        let verdict = Judgment::incompatible("type changed").combine(&Judgment::same());
        let differ = Scripted(verdict);

        for mode in [Mode::Development, Mode::Production] {
            let evaluation = evaluate(&differ, "base", "cand", mode).unwrap();
            assert!(!evaluation.accepted, "{mode}");
            assert_eq!(evaluation.judgment.reasons(), ["type changed"]);
        }
    }

    #[test]
    fn test_differ_errors_pass_through() {
        let differ = Scripted(Judgment::same());
        let err = evaluate(&differ, "", "cand", Mode::Development).unwrap_err();
        assert_eq!(err, "empty template");
    }

    #[test]
    fn test_acceptable_override() {
        let policy = Policy::new().with_acceptable(Mode::Production, [Verdict::Same]);

        assert!(!policy.accepts(Mode::Production, Verdict::Newer));
        assert!(policy.accepts(Mode::Development, Verdict::Newer));

        let evaluation = policy.judge(Judgment::newer("field added"), Mode::Production);
        assert!(!evaluation.accepted);
    }

    #[test]
    fn test_default_policy_uses_mode_defaults() {
        let policy = Policy::new();
        for mode in [Mode::Development, Mode::Production] {
            let expected: BTreeSet<Verdict> = mode.default_acceptable().iter().copied().collect();
            assert_eq!(policy.acceptable(mode), &expected, "{mode}");
            assert!(!policy.accepts(mode, Verdict::Incompatible));
        }
        assert_eq!(Policy::default(), policy);
    }

    #[test]
    fn test_mode_deserializes_like_it_parses() {
        let mode: Mode = serde_json::from_str("\"Production\"").unwrap();
        assert_eq!(mode, Mode::Production);
        assert!(serde_json::from_str::<Mode>("\"staging\"").is_err());
        assert_eq!(serde_json::to_string(&Mode::Production).unwrap(), "\"production\"");
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("production".parse::<Mode>().unwrap(), Mode::Production);
        assert_eq!("Development".parse::<Mode>().unwrap(), Mode::Development);
        assert!(matches!("staging".parse::<Mode>(), Err(CompatError::UnknownMode(_))));
        assert_eq!(Mode::default(), Mode::Development);
    }
}
