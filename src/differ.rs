//! Reference differ for JSON message catalogs
//!
//! Compares two catalogs of the form
//!
//! ```json
//! {
//!   "messages": {
//!     "AgentUpdate": {
//!       "properties": { "AgentID": { "type": "string" } },
//!       "required": ["AgentID"]
//!     }
//!   }
//! }
//! ```
//!
//! A top-level object without `messages` is compared as one unnamed message.
//! Every difference becomes an elementary [`Judgment`]; they are folded with
//! [`Judgment::combine_all`].

use serde_json::{Map, Value};
use thiserror::Error;

use crate::compatibility::Judgment;
use crate::policy::SchemaDiffer;

/// Failure to read a template; never reported as a judgment
#[derive(Error, Debug)]
pub enum DiffError {
    #[error("Cannot parse {side} template: {source}")]
    Parse {
        side: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid {side} template: {reason}")]
    Shape { side: &'static str, reason: String },
}

/// Property-level differ for JSON message catalogs
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSchemaDiffer;

impl JsonSchemaDiffer {
    pub fn new() -> Self {
        Self
    }

    /// Parse template text; `side` names the template in error messages
    pub fn parse(text: &str, side: &'static str) -> Result<Value, DiffError> {
        serde_json::from_str(text).map_err(|source| DiffError::Parse { side, source })
    }

    /// Parse both texts and diff them
    pub fn diff_text(&self, baseline: &str, candidate: &str) -> Result<Judgment, DiffError> {
        let baseline = Self::parse(baseline, "baseline")?;
        let candidate = Self::parse(candidate, "candidate")?;
        self.diff(&baseline, &candidate)
    }

    /// Messages of a template, and whether it uses the `messages` catalog layout
    fn messages<'v>(
        template: &'v Value,
        side: &'static str,
    ) -> Result<(bool, Vec<(&'v str, &'v Value)>), DiffError> {
        let root = template.as_object().ok_or_else(|| DiffError::Shape {
            side,
            reason: "top level is not an object".to_string(),
        })?;

        let Some(messages) = root.get("messages") else {
            return Ok((false, vec![("", template)]));
        };
        let messages = messages.as_object().ok_or_else(|| DiffError::Shape {
            side,
            reason: "'messages' is not an object".to_string(),
        })?;

        let messages = messages
            .iter()
            .map(|(name, message)| {
                if message.is_object() {
                    Ok((name.as_str(), message))
                } else {
                    Err(DiffError::Shape {
                        side,
                        reason: format!("message '{}' is not an object", name),
                    })
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok((true, messages))
    }

    /// Compare one object schema: its properties, required list and enum
    fn compare_object(old: &Value, new: &Value) -> Judgment {
        let empty = Map::new();
        let old_props = old.get("properties").and_then(|p| p.as_object()).unwrap_or(&empty);
        let new_props = new.get("properties").and_then(|p| p.as_object()).unwrap_or(&empty);

        let mut judgments = Vec::new();

        for (name, old_prop) in old_props {
            let Some(new_prop) = new_props.get(name) else {
                judgments.push(Judgment::older(format!("property '{}' removed", name)));
                continue;
            };

            let old_type = old_prop.get("type");
            let new_type = new_prop.get("type");
            if old_type != new_type {
                judgments.push(Judgment::incompatible(format!(
                    "property '{}' type changed from {} to {}",
                    name,
                    render(old_type),
                    render(new_type)
                )));
                continue;
            }

            match (is_required(old, name), is_required(new, name)) {
                (false, true) => {
                    judgments.push(Judgment::incompatible(format!("property '{}' became required", name)));
                }
                (true, false) => {
                    judgments.push(Judgment::newer(format!("property '{}' became optional", name)));
                }
                _ => {}
            }

            let nested = Self::compare_object(old_prop, new_prop);
            if !nested.is_same() {
                judgments.push(nested.prefix(&format!("property '{}': ", name)));
            }
        }

        for (name, _) in new_props.iter().filter(|(name, _)| !old_props.contains_key(*name)) {
            if is_required(new, name) {
                judgments.push(Judgment::incompatible(format!("required property '{}' added", name)));
            } else {
                judgments.push(Judgment::newer(format!("property '{}' added", name)));
            }
        }

        if let (Some(old_enum), Some(new_enum)) = (
            old.get("enum").and_then(|e| e.as_array()),
            new.get("enum").and_then(|e| e.as_array()),
        ) {
            for removed in old_enum.iter().filter(|v| !new_enum.contains(v)) {
                judgments.push(Judgment::older(format!("enum value {} removed", removed)));
            }
            for added in new_enum.iter().filter(|v| !old_enum.contains(v)) {
                judgments.push(Judgment::newer(format!("enum value {} added", added)));
            }
        }

        for judgment in &judgments {
            tracing::trace!(verdict = %judgment.verdict(), reasons = ?judgment.reasons(), "elementary judgment");
        }

        Judgment::combine_all(judgments).unwrap_or_else(Judgment::same)
    }
}

impl SchemaDiffer for JsonSchemaDiffer {
    type Schema = Value;
    type Error = DiffError;

    fn diff(&self, baseline: &Value, candidate: &Value) -> Result<Judgment, DiffError> {
        let (old_catalog, old_messages) = Self::messages(baseline, "baseline")?;
        let (new_catalog, new_messages) = Self::messages(candidate, "candidate")?;
        if old_catalog != new_catalog {
            let layout = |catalog: bool| if catalog { "a message catalog" } else { "a bare schema" };
            return Err(DiffError::Shape {
                side: "candidate",
                reason: format!(
                    "candidate is {} but baseline is {}",
                    layout(new_catalog),
                    layout(old_catalog)
                ),
            });
        }

        let mut judgments = Vec::new();

        for (name, old_message) in &old_messages {
            match new_messages.iter().find(|(n, _)| n == name) {
                Some((_, new_message)) => {
                    let judgment = Self::compare_object(old_message, new_message);
                    if name.is_empty() {
                        judgments.push(judgment);
                    } else {
                        judgments.push(judgment.prefix(&format!("message '{}': ", name)));
                    }
                }
                None => judgments.push(Judgment::older(format!("message '{}' removed", name))),
            }
        }

        for (name, _) in &new_messages {
            if !old_messages.iter().any(|(n, _)| n == name) {
                judgments.push(Judgment::newer(format!("message '{}' added", name)));
            }
        }

        let judgment = Judgment::combine_all(judgments).unwrap_or_else(Judgment::same);
        tracing::debug!(
            baseline_messages = old_messages.len(),
            candidate_messages = new_messages.len(),
            verdict = %judgment.verdict(),
            "template diff complete"
        );
        Ok(judgment)
    }
}

fn is_required(schema: &Value, name: &str) -> bool {
    schema
        .get("required")
        .and_then(|r| r.as_array())
        .map(|r| r.iter().any(|v| v.as_str() == Some(name)))
        .unwrap_or(false)
}

fn render(value: Option<&Value>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "none".to_string())
}
