//! Domain model for on-site assembly.
//!
//! Assembly tasks are ordered stages of a job role. The domain holds the
//! task state machine, stage ordering queries, issue records and the
//! evidence required to finish a stage.

mod error;
mod evidence;
mod ids;
mod issue;
mod stage;
mod status;
mod task;

pub use error::AssemblyDomainError;
pub use evidence::{CompletionEvidence, EvidenceDraft, EvidenceError, EvidenceKind};
pub use ids::IssueId;
pub use issue::{Issue, IssueReport, IssueReportError, IssueStatus};
pub use stage::{check_stage_sequence, is_first_stage, is_last_stage, stage_group};
pub use status::{TaskEvent, TaskStatus};
pub use task::{AssemblyTask, StageOrder};
