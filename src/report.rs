//! Verification reports
//!
//! Text reports use the verifier's traditional layout:
//!
//! ```text
//! *** FAIL ***
//! Older
//!         message 'AgentUpdate': property 'Flags' removed
//! ```

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::checksum::Checksum;
use crate::compatibility::Judgment;
use crate::error::{CompatError, Result};
use crate::policy::{Evaluation, Mode};

/// Output format for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for ReportFormat {
    type Err = CompatError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            _ => Err(CompatError::UnknownFormat(s.to_string())),
        }
    }
}

impl TryFrom<String> for ReportFormat {
    type Error = CompatError;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

/// Everything printed about one verification run
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    pub mode: Mode,
    pub accepted: bool,
    #[serde(flatten)]
    pub judgment: Judgment,
    pub baseline_checksum: Checksum,
    pub candidate_checksum: Checksum,
}

impl Report {
    pub fn new(evaluation: &Evaluation, baseline_text: &str, candidate_text: &str) -> Self {
        Self {
            generated_at: Utc::now(),
            mode: evaluation.mode,
            accepted: evaluation.accepted,
            judgment: evaluation.judgment.clone(),
            baseline_checksum: Checksum::of_text(baseline_text),
            candidate_checksum: Checksum::of_text(candidate_text),
        }
    }

    pub fn header(&self) -> &'static str {
        if self.accepted {
            "--- PASS ---"
        } else {
            "*** FAIL ***"
        }
    }

    /// Header, then the explanation with every reason indented by a tab
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        out.push_str(self.header());
        out.push('\n');
        for (index, line) in self.judgment.explain().lines().enumerate() {
            if index > 0 {
                out.push('\t');
            }
            out.push_str(line);
            out.push('\n');
        }
        out
    }

    pub fn render_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }

    pub fn render(&self, format: ReportFormat, pretty: bool) -> Result<String> {
        match format {
            ReportFormat::Text => Ok(self.render_text()),
            ReportFormat::Json => self.render_json(pretty),
        }
    }
}
