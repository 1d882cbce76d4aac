//! Message Template Compatibility
//!
//! Decides whether a proposed change to a wire-protocol message template is
//! safe to ship.
//!
//! ## Features
//!
//! - **Compatibility Lattice**: Same, Newer, Older, Mixed and Incompatible
//!   judgments, merged field by field into one verdict
//! - **Strictness Modes**: `development` accepts anything short of
//!   incompatible, `production` only unchanged or additive templates
//! - **Pluggable Differs**: any parser implementing [`SchemaDiffer`] can feed
//!   the policy; [`JsonSchemaDiffer`] handles JSON message catalogs
//! - **Reports**: PASS/FAIL text or JSON, with checksums of both inputs
//!
//! ## Example
//!
//! ```
//! use template_compat::{evaluate, JsonSchemaDiffer, Mode, Verdict};
//! use serde_json::json;
//!
//! let baseline = json!({ "properties": { "Flags": { "type": "integer" } } });
//! let candidate = json!({ "properties": {} });
//!
//! let evaluation = evaluate(&JsonSchemaDiffer::new(), &baseline, &candidate, Mode::Production).unwrap();
//! assert!(!evaluation.accepted);
//! assert_eq!(evaluation.judgment.verdict(), Verdict::Older);
//! ```

pub mod compatibility;
pub mod policy;
pub mod differ;
pub mod report;
pub mod checksum;
pub mod config;
pub mod error;

pub use compatibility::{Judgment, Verdict};
pub use policy::{evaluate, Evaluation, Mode, Policy, SchemaDiffer};
pub use differ::{DiffError, JsonSchemaDiffer};
pub use report::{Report, ReportFormat};
pub use checksum::Checksum;
pub use config::VerifierConfig;
pub use error::{CompatError, Result};
