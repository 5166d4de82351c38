//! Application services for assembly workflows.

mod error;
mod evidence;
mod ledger;
mod workflow;

pub use error::{IssueLedgerError, WorkflowError, WorkflowResult};
pub use evidence::EvidenceUploader;
pub use ledger::IssueLedger;
pub use workflow::StageWorkflowEngine;
