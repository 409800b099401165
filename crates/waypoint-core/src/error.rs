//! Workflow error types.

use crate::ids::{OperationName, StepName};
use thiserror::Error;

/// Errors that can occur while running a workflow.
///
/// Registration never fails and missing routes or handlers are ordinary
/// control flow, so the only failures are dispatch failures and a second
/// run on an engine that is already mid-run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum WorkflowError {
    /// The document does not expose the operation bound to the current step.
    ///
    /// The run stops immediately; the engine's current step is left at `step`.
    #[error("Unknown operation '{operation}' for step '{step}'")]
    UnknownOperation {
        /// The step whose handler could not be dispatched.
        step: StepName,
        /// The operation the handler table named.
        operation: OperationName,
    },

    /// The engine is already executing a run.
    ///
    /// One engine instance drives one execution at a time; build one engine
    /// per document to run several concurrently.
    #[error("Workflow is already running (at step '{step}')")]
    AlreadyRunning {
        /// The step the in-flight run was at when the second run was rejected.
        step: StepName,
    },
}
