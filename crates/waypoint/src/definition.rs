//! Serializable snapshot of a workflow's handler and route tables.

use crate::workflow::{Workflow, WorkflowBuilder};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use waypoint_core::{Event, OperationName, StepName};

/// The handler and route tables of a workflow, detached from any engine.
///
/// Maps are ordered so a definition always serializes the same way. Both
/// tables default to empty when absent from the input.
///
/// # Examples
///
/// ```
/// use waypoint::{Workflow, WorkflowDefinition};
///
/// let workflow = Workflow::builder()
///     .handler("new", "NewOrderHandler")
///     .route("start", "PlaceOrder")
///     .build();
///
/// let definition = workflow.definition();
/// assert_eq!(definition.handlers.len(), 1);
///
/// let copy = Workflow::from(definition);
/// assert_eq!(copy.route_for("start").map(|s| s.as_str()), Some("PlaceOrder"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowDefinition {
    /// Step to operation bindings.
    #[serde(default)]
    pub handlers: BTreeMap<StepName, OperationName>,
    /// Event to step bindings.
    #[serde(default)]
    pub routes: BTreeMap<Event, StepName>,
}

impl Workflow {
    /// Exports the handler and route tables.
    pub fn definition(&self) -> WorkflowDefinition {
        WorkflowDefinition {
            handlers: self
                .handlers()
                .iter()
                .map(|(step, op)| (step.clone(), op.clone()))
                .collect(),
            routes: self
                .routes()
                .iter()
                .map(|(event, step)| (event.clone(), step.clone()))
                .collect(),
        }
    }
}

impl From<WorkflowDefinition> for WorkflowBuilder {
    fn from(definition: WorkflowDefinition) -> Self {
        WorkflowBuilder::from_tables(
            definition.handlers.into_iter().collect(),
            definition.routes.into_iter().collect(),
        )
    }
}

impl From<WorkflowDefinition> for Workflow {
    fn from(definition: WorkflowDefinition) -> Self {
        WorkflowBuilder::from(definition).build()
    }
}
