//! Workflow engine for dispatching handlers and routing events.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{PoisonError, RwLock};
use tracing::{debug, info, warn};
use waypoint_core::{Document, Event, OperationName, StepName, WorkflowError};

/// A workflow engine that drives a document from step to step.
///
/// The engine owns two tables: a handler table binding each step to the
/// document operation that runs there, and a route table binding each event
/// to the step it leads to. The route table is global, so an event always
/// leads to the same step regardless of which step produced it.
///
/// A run stops at the first step with no registered handler. If a handler
/// returns an event with no route, the current step is kept and its handler
/// runs again on the next iteration. A handler that keeps returning an
/// unrouted event therefore loops forever.
///
/// One engine runs one execution at a time. A concurrent [`Workflow::run`] on
/// the same instance is rejected with [`WorkflowError::AlreadyRunning`].
pub struct Workflow {
    handlers: HashMap<StepName, OperationName>,
    routes: HashMap<Event, StepName>,
    state: ExecutionState,
}

struct ExecutionState {
    running: AtomicBool,
    current: RwLock<StepName>,
}

impl ExecutionState {
    fn new() -> Self {
        Self {
            running: AtomicBool::new(false),
            current: RwLock::new(StepName::NEW),
        }
    }

    fn current(&self) -> StepName {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_current(&self, step: StepName) {
        *self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner) = step;
    }
}

/// Clears the running flag however a run exits.
struct RunningGuard<'a>(&'a AtomicBool);

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl fmt::Debug for Workflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Workflow")
            .field("handlers", &self.handlers.keys().collect::<Vec<_>>())
            .field("routes", &self.routes.keys().collect::<Vec<_>>())
            .field("current", &self.current_step())
            .field("running", &self.is_running())
            .finish()
    }
}

impl Default for Workflow {
    fn default() -> Self {
        Self::new()
    }
}

impl Workflow {
    /// Creates an engine with empty tables, positioned at [`StepName::NEW`].
    pub fn new() -> Self {
        Self::from_tables(HashMap::new(), HashMap::new())
    }

    pub(crate) fn from_tables(
        handlers: HashMap<StepName, OperationName>,
        routes: HashMap<Event, StepName>,
    ) -> Self {
        Self {
            handlers,
            routes,
            state: ExecutionState::new(),
        }
    }

    /// Creates a new workflow builder.
    pub fn builder() -> WorkflowBuilder {
        WorkflowBuilder::new()
    }

    /// Binds `operation` to `step`, replacing any earlier handler for it.
    pub fn add_handler(
        &mut self,
        step: impl Into<StepName>,
        operation: impl Into<OperationName>,
    ) {
        self.handlers.insert(step.into(), operation.into());
    }

    /// Routes `event` to `step`, replacing any earlier route for it.
    pub fn add_route(&mut self, event: impl Into<Event>, step: impl Into<StepName>) {
        self.routes.insert(event.into(), step.into());
    }

    /// Returns the operation bound to `step`, if any.
    pub fn handler_for(&self, step: &str) -> Option<&OperationName> {
        self.handlers.get(step)
    }

    /// Returns the step `event` routes to, if any.
    pub fn route_for(&self, event: &str) -> Option<&StepName> {
        self.routes.get(event)
    }

    /// Returns `true` if a handler is registered for `step`.
    pub fn has_handler(&self, step: &str) -> bool {
        self.handlers.contains_key(step)
    }

    /// Returns the number of registered handlers.
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Returns the number of registered routes.
    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    pub(crate) fn handlers(&self) -> &HashMap<StepName, OperationName> {
        &self.handlers
    }

    pub(crate) fn routes(&self) -> &HashMap<Event, StepName> {
        &self.routes
    }

    /// Returns `true` while a run is in progress on this engine.
    pub fn is_running(&self) -> bool {
        self.state.running.load(Ordering::Acquire)
    }

    /// Returns the step the engine is at.
    ///
    /// Before the first run this is [`StepName::NEW`]; during a run it is the
    /// step being executed; afterwards it is the step where the run stopped.
    pub fn current_step(&self) -> StepName {
        self.state.current()
    }

    /// Checks that `document` supports every operation named in the handler
    /// table.
    ///
    /// Steps are checked in name order and the first unsupported operation is
    /// reported. Routes are not inspected.
    pub fn verify_document<D: Document + ?Sized>(
        &self,
        document: &D,
    ) -> Result<(), WorkflowError> {
        let mut bindings: Vec<_> = self.handlers.iter().collect();
        bindings.sort_by(|a, b| a.0.cmp(b.0));

        for (step, operation) in bindings {
            if !document.supports(operation) {
                return Err(WorkflowError::UnknownOperation {
                    step: step.clone(),
                    operation: operation.clone(),
                });
            }
        }
        Ok(())
    }

    /// Runs `document` through the workflow starting at `start`.
    ///
    /// Returns the terminal step, the first step reached that has no handler.
    /// If `start` itself has no handler the run ends immediately without
    /// touching the document.
    ///
    /// # Errors
    ///
    /// - [`WorkflowError::AlreadyRunning`] if another run is in progress on
    ///   this engine.
    /// - [`WorkflowError::UnknownOperation`] if the document does not expose
    ///   the operation bound to a step. The engine stays at that step.
    pub fn run<D: Document + ?Sized>(
        &self,
        document: &mut D,
        start: impl Into<StepName>,
    ) -> Result<StepName, WorkflowError> {
        if self
            .state
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(WorkflowError::AlreadyRunning {
                step: self.current_step(),
            });
        }
        let _running = RunningGuard(&self.state.running);

        let mut current = start.into();
        self.state.set_current(current.clone());
        info!("Workflow run started at step '{}'", current);

        let mut dispatched: u64 = 0;
        while let Some(operation) = self.handlers.get(&current) {
            debug!("Step '{}' dispatching '{}'", current, operation);
            let event = match document.invoke(operation) {
                Some(event) => event,
                None => {
                    warn!(
                        "Step '{}' failed: document has no operation '{}'",
                        current, operation
                    );
                    return Err(WorkflowError::UnknownOperation {
                        step: current,
                        operation: operation.clone(),
                    });
                }
            };
            dispatched += 1;

            match self.routes.get(&event) {
                Some(next) => {
                    debug!("Event '{}' routes '{}' -> '{}'", event, current, next);
                    current = next.clone();
                    self.state.set_current(current.clone());
                }
                None => {
                    warn!(
                        "Event '{}' has no route, replaying step '{}'",
                        event, current
                    );
                }
            }
        }

        info!(
            "Workflow run finished at step '{}' after {} dispatches",
            current, dispatched
        );
        Ok(current)
    }
}

/// Builder for constructing [`Workflow`] instances with finished tables.
///
/// Registration follows the same last-one-wins rule as
/// [`Workflow::add_handler`] and [`Workflow::add_route`]. The builder is
/// `Clone`, so one set of tables can produce an engine per document.
#[derive(Debug, Clone, Default)]
pub struct WorkflowBuilder {
    handlers: HashMap<StepName, OperationName>,
    routes: HashMap<Event, StepName>,
}

impl WorkflowBuilder {
    /// Creates a new empty workflow builder.
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            routes: HashMap::new(),
        }
    }

    /// Binds `operation` to `step`.
    pub fn handler(
        mut self,
        step: impl Into<StepName>,
        operation: impl Into<OperationName>,
    ) -> Self {
        self.handlers.insert(step.into(), operation.into());
        self
    }

    /// Routes `event` to `step`.
    pub fn route(mut self, event: impl Into<Event>, step: impl Into<StepName>) -> Self {
        self.routes.insert(event.into(), step.into());
        self
    }

    pub(crate) fn from_tables(
        handlers: HashMap<StepName, OperationName>,
        routes: HashMap<Event, StepName>,
    ) -> Self {
        Self { handlers, routes }
    }

    /// Builds the workflow.
    pub fn build(self) -> Workflow {
        Workflow::from_tables(self.handlers, self.routes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waypoint_core::document_operations;

    #[derive(Debug, Default)]
    struct Probe {
        calls: Vec<&'static str>,
    }

    impl Probe {
        fn first(&mut self) -> Event {
            self.calls.push("first");
            Event::new("done")
        }

        fn second(&mut self) -> Event {
            self.calls.push("second");
            Event::new("done")
        }
    }

    document_operations!(Probe {
        "First" => first,
        "Second" => second,
    });

    #[test]
    fn test_new_workflow_defaults() {
        let workflow = Workflow::new();
        assert_eq!(workflow.current_step(), StepName::NEW);
        assert!(!workflow.is_running());
        assert_eq!(workflow.handler_count(), 0);
        assert_eq!(workflow.route_count(), 0);
    }

    #[test]
    fn test_run_without_handlers_stops_at_start() {
        let workflow = Workflow::new();
        let mut probe = Probe::default();

        let end = workflow.run(&mut probe, "Anywhere").expect("run");

        assert_eq!(end, "Anywhere");
        assert_eq!(workflow.current_step(), "Anywhere");
        assert!(!workflow.is_running());
        assert!(probe.calls.is_empty());
    }

    #[test]
    fn test_route_overwrite() {
        let mut workflow = Workflow::new();
        workflow.add_route("done", "X");
        workflow.add_route("done", "Y");

        assert_eq!(workflow.route_count(), 1);
        assert_eq!(workflow.route_for("done").map(StepName::as_str), Some("Y"));

        workflow.add_handler("A", "First");
        let mut probe = Probe::default();
        assert_eq!(workflow.run(&mut probe, "A").expect("run"), "Y");
    }

    #[test]
    fn test_handler_overwrite() {
        let mut workflow = Workflow::new();
        workflow.add_handler("A", "First");
        workflow.add_handler("A", "Second");
        workflow.add_route("done", "End");

        assert_eq!(workflow.handler_count(), 1);
        assert_eq!(
            workflow.handler_for("A").map(OperationName::as_str),
            Some("Second")
        );

        let mut probe = Probe::default();
        workflow.run(&mut probe, "A").expect("run");
        assert_eq!(probe.calls, vec!["second"]);
    }

    #[test]
    fn test_inspection_is_idempotent() {
        let workflow = Workflow::builder()
            .handler("A", "First")
            .route("done", "End")
            .build();
        let mut probe = Probe::default();
        workflow.run(&mut probe, "A").expect("run");

        for _ in 0..3 {
            assert_eq!(workflow.current_step(), "End");
            assert!(!workflow.is_running());
        }
        assert_eq!(probe.calls, vec!["first"]);
    }

    #[test]
    fn test_unknown_operation_leaves_step_and_clears_running() {
        let workflow = Workflow::builder()
            .handler("A", "First")
            .handler("B", "Missing")
            .route("done", "B")
            .build();
        let mut probe = Probe::default();

        let err = workflow.run(&mut probe, "A").unwrap_err();

        assert_eq!(
            err,
            WorkflowError::UnknownOperation {
                step: StepName::new("B"),
                operation: OperationName::new("Missing"),
            }
        );
        assert_eq!(workflow.current_step(), "B");
        assert!(!workflow.is_running());
        assert_eq!(probe.calls, vec!["first"]);
    }

    #[test]
    fn test_verify_document() {
        let workflow = Workflow::builder()
            .handler("A", "First")
            .handler("B", "Second")
            .build();
        assert!(workflow.verify_document(&Probe::default()).is_ok());

        let workflow = Workflow::builder()
            .handler("B", "Nope")
            .handler("A", "AlsoNope")
            .build();
        match workflow.verify_document(&Probe::default()) {
            Err(WorkflowError::UnknownOperation { step, operation }) => {
                assert_eq!(step, "A");
                assert_eq!(operation, "AlsoNope");
            }
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_builder_clone_yields_independent_engines() {
        let builder = Workflow::builder()
            .handler("A", "First")
            .route("done", "End");

        let one = builder.clone().build();
        let two = builder.build();

        let mut probe = Probe::default();
        one.run(&mut probe, "A").expect("run");

        assert_eq!(one.current_step(), "End");
        assert_eq!(two.current_step(), StepName::NEW);
    }

    #[test]
    fn test_debug_lists_tables() {
        let workflow = Workflow::builder().handler("A", "First").build();
        let debug = format!("{:?}", workflow);
        assert!(debug.contains("Workflow"));
        assert!(debug.contains("\"A\""));
        assert!(debug.contains("running: false"));
    }
}
