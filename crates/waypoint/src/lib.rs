//! # Waypoint
//!
//! A minimal in-process workflow executor.
//!
//! A [`Workflow`] binds each step to a document operation (its handler) and
//! each event to the step it leads to (its route). [`Workflow::run`] invokes
//! the handler for the current step, follows the route for the event it
//! returns, and repeats until it reaches a step with no handler.
//!
//! ## Features
//!
//! - **Type-safe identifiers**: [`StepName`], [`Event`] and [`OperationName`] newtypes
//! - **No reflection**: documents implement [`Document`], usually via [`document_operations!`]
//!   or an [`OperationTable`]
//! - **Inspectable**: [`Workflow::is_running`] and [`Workflow::current_step`] can be read from
//!   any thread, including mid-run
//! - **Portable tables**: [`WorkflowDefinition`] serializes with `serde`
//!
//! ## Quick Start
//!
//! ```rust
//! use waypoint::prelude::*;
//!
//! struct Order {
//!     status: &'static str,
//! }
//!
//! impl Order {
//!     fn open(&mut self) -> Event {
//!         self.status = "Started";
//!         Event::START
//!     }
//!
//!     fn place(&mut self) -> Event {
//!         self.status = "Ordered";
//!         Event::new("ordered")
//!     }
//! }
//!
//! document_operations!(Order {
//!     "NewOrderHandler" => open,
//!     "PlaceOrderHandler" => place,
//! });
//!
//! let workflow = Workflow::builder()
//!     .handler(StepName::NEW, "NewOrderHandler")
//!     .route(Event::START, "PlaceOrder")
//!     .handler("PlaceOrder", "PlaceOrderHandler")
//!     .route("ordered", "Complete")
//!     .build();
//!
//! let mut order = Order { status: "Beginning" };
//! let end = workflow.run(&mut order, StepName::NEW).expect("workflow failed");
//!
//! assert_eq!(end, "Complete");
//! assert_eq!(order.status, "Ordered");
//! assert!(!workflow.is_running());
//! ```
//!
//! ## Unrouted events
//!
//! An event with no route leaves the engine at the same step, so the step's
//! handler runs again. A handler that never returns a routed event keeps the
//! run going forever; route every event a handler can return.
//!
//! ## Error Handling
//!
//! ```rust
//! use waypoint::prelude::*;
//!
//! struct Empty;
//!
//! impl Document for Empty {
//!     fn invoke(&mut self, _operation: &OperationName) -> Option<Event> {
//!         None
//!     }
//!
//!     fn supports(&self, _operation: &OperationName) -> bool {
//!         false
//!     }
//! }
//!
//! let workflow = Workflow::builder().handler("Fetch", "FetchHandler").build();
//!
//! match workflow.run(&mut Empty, "Fetch") {
//!     Err(WorkflowError::UnknownOperation { step, operation }) => {
//!         eprintln!("Step {} has no operation {}", step, operation);
//!     }
//!     Err(error) => eprintln!("Error: {}", error),
//!     Ok(end) => println!("Finished at {}", end),
//! }
//! assert_eq!(workflow.current_step(), "Fetch");
//! ```

mod definition;
mod workflow;

// Re-export core types
pub use waypoint_core::*;

pub use definition::WorkflowDefinition;
pub use workflow::{Workflow, WorkflowBuilder};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        document_operations, BoundDocument, Document, Event, OperationName, OperationTable,
        StepName, Workflow, WorkflowBuilder, WorkflowDefinition, WorkflowError,
    };
}
