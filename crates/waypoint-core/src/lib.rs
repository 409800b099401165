//! Core types for the waypoint workflow engine.
//!
//! This crate provides the vocabulary shared by the engine and the documents
//! it drives, without any runtime dependencies.
//!
//! # Core Types
//!
//! - [`StepName`], [`Event`], [`OperationName`] - Type-safe identifiers
//! - [`Document`] - The capability a workflow dispatches handlers against
//! - [`OperationTable`] - Name-to-closure registry for plain data documents
//! - [`WorkflowError`] - Error types for workflow execution
//!
//! # Macros
//!
//! - [`document_operations!`] - Implement [`Document`] from a type's methods

mod document;
mod error;
mod ids;

pub use document::{BoundDocument, Document, OperationTable};
pub use error::WorkflowError;
pub use ids::{Event, OperationName, StepName};
