//! Compatibility lattice
//!
//! A [`Judgment`] is the verdict reached when comparing two versions of a
//! message template (or two elements inside them), together with the reasons
//! that led to it. Judgments from individual fields and messages are folded
//! into one overall verdict with [`Judgment::combine`]:
//!
//! ```text
//!     I   M   O   N   S
//!     --  --  --  --  --
//! I:  I   I   I   I   I
//! M:  I   M   M   M   M
//! O:  I   M   O   M   O
//! N:  I   M   M   N   N
//! S:  I   M   O   N   S
//! ```
//!
//! The weakest constituent wins, except that an `Older` meeting a `Newer`
//! becomes `Mixed`.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CompatError;

/// Kind of compatibility verdict
///
/// Variants are declared in level order, so the derived `Ord` agrees with
/// [`Verdict::level`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum Verdict {
    /// Candidate cannot talk to the baseline at all
    Incompatible,
    /// Older and newer changes side by side
    Mixed,
    /// Candidate is a rollback of the baseline
    Older,
    /// Candidate strictly extends the baseline
    Newer,
    /// Nothing that matters on the wire changed
    Same,
}

impl Verdict {
    /// Every verdict, lowest level first
    pub const ALL: [Verdict; 5] = [
        Verdict::Incompatible,
        Verdict::Mixed,
        Verdict::Older,
        Verdict::Newer,
        Verdict::Same,
    ];

    /// Fixed numeric level of this verdict
    pub fn level(self) -> f64 {
        match self {
            Verdict::Incompatible => -2.0,
            Verdict::Mixed => -1.0,
            Verdict::Older => -0.25,
            Verdict::Newer => 0.25,
            Verdict::Same => 1.0,
        }
    }

    /// Display name, as printed at the head of an explanation
    pub fn name(self) -> &'static str {
        match self {
            Verdict::Incompatible => "Incompatible",
            Verdict::Mixed => "Mixed",
            Verdict::Older => "Older",
            Verdict::Newer => "Newer",
            Verdict::Same => "Same",
        }
    }

    fn is_aged(self) -> bool {
        matches!(self, Verdict::Older | Verdict::Newer)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Verdict {
    type Err = CompatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Verdict::ALL
            .into_iter()
            .find(|v| v.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CompatError::UnknownVerdict(s.to_string()))
    }
}

impl TryFrom<String> for Verdict {
    type Error = CompatError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A compatibility verdict with the reasons behind it
///
/// Judgments are values: every operation returns a new judgment with its own
/// reason list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Judgment {
    verdict: Verdict,
    reasons: Vec<String>,
}

impl Judgment {
    fn leaf(verdict: Verdict, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        let reasons = if reason.is_empty() { Vec::new() } else { vec![reason] };
        Self { verdict, reasons }
    }

    /// The candidate cannot communicate with the baseline
    pub fn incompatible(reason: impl Into<String>) -> Self {
        Self::leaf(Verdict::Incompatible, reason)
    }

    /// The candidate lost something the baseline had
    pub fn older(reason: impl Into<String>) -> Self {
        Self::leaf(Verdict::Older, reason)
    }

    /// The candidate added something the baseline lacks
    pub fn newer(reason: impl Into<String>) -> Self {
        Self::leaf(Verdict::Newer, reason)
    }

    /// No difference
    pub fn same() -> Self {
        Self {
            verdict: Verdict::Same,
            reasons: Vec::new(),
        }
    }

    /// Flatten a sequence of judgments into one `Mixed` judgment.
    ///
    /// Reasons are concatenated in input order; `combine` is not consulted.
    ///
    /// # Panics
    ///
    /// Panics if `inputs` is empty.
    pub fn mixed<'a, I>(inputs: I) -> Self
    where
        I: IntoIterator<Item = &'a Judgment>,
    {
        let mut count = 0usize;
        let mut reasons = Vec::new();
        for input in inputs {
            count += 1;
            reasons.extend(input.reasons.iter().cloned());
        }
        assert!(count > 0, "a mixed judgment needs at least one input");
        Self {
            verdict: Verdict::Mixed,
            reasons,
        }
    }

    pub fn verdict(&self) -> Verdict {
        self.verdict
    }

    pub fn level(&self) -> f64 {
        self.verdict.level()
    }

    pub fn reasons(&self) -> &[String] {
        &self.reasons
    }

    /// Merge two judgments into one.
    ///
    /// On a level tie the left operand's verdict is kept. An `Older`/`Newer`
    /// pair becomes `Mixed`. Otherwise the lower level absorbs the higher one.
    /// In every case the result lists `self`'s reasons before `other`'s,
    /// except when `other` absorbs, where `other`'s come first.
    pub fn combine(&self, other: &Judgment) -> Judgment {
        match self.verdict.cmp(&other.verdict) {
            Ordering::Equal => self.absorb(other),
            _ if self.verdict.is_aged()
                && other.verdict.is_aged()
                && self.level().trunc() == other.level().trunc() =>
            {
                Judgment::mixed([self, other])
            }
            Ordering::Less => self.absorb(other),
            Ordering::Greater => other.absorb(self),
        }
    }

    /// Left fold of [`combine`](Self::combine); `None` for no judgments.
    pub fn combine_all<I>(judgments: I) -> Option<Judgment>
    where
        I: IntoIterator<Item = Judgment>,
    {
        judgments.into_iter().reduce(|acc, next| acc.combine(&next))
    }

    fn absorb(&self, other: &Judgment) -> Judgment {
        let mut reasons = Vec::with_capacity(self.reasons.len() + other.reasons.len());
        reasons.extend_from_slice(&self.reasons);
        reasons.extend_from_slice(&other.reasons);
        Judgment {
            verdict: self.verdict,
            reasons,
        }
    }

    /// Copy of this judgment with `leadin` in front of every reason
    pub fn prefix(&self, leadin: &str) -> Judgment {
        Judgment {
            verdict: self.verdict,
            reasons: self
                .reasons
                .iter()
                .map(|reason| format!("{leadin}{reason}"))
                .collect(),
        }
    }

    /// Nothing changed
    pub fn is_same(&self) -> bool {
        self.level() >= 1.0
    }

    /// Safe to ship without coordinating a rollout
    pub fn is_deployable(&self) -> bool {
        self.level() > 0.0
    }

    /// Not ambiguous
    pub fn is_resolved(&self) -> bool {
        self.level() > -1.0
    }

    pub fn is_compatible(&self) -> bool {
        self.level() > -2.0
    }

    /// Verdict name followed by one reason per line
    pub fn explain(&self) -> String {
        let mut out = String::from(self.verdict.name());
        out.push('\n');
        for reason in &self.reasons {
            out.push_str(reason);
            out.push('\n');
        }
        out
    }
}
