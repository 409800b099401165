//! The document capability the engine dispatches handlers against.

use crate::ids::{Event, OperationName};
use std::collections::HashMap;
use std::fmt;

/// A stateful object whose named operations act as workflow handlers.
///
/// The engine never reads or writes document fields. It only asks the
/// document to perform the operation bound to the current step and reads the
/// [`Event`] that comes back.
///
/// Most documents implement this trait with [`document_operations!`] or by
/// binding an [`OperationTable`]; a hand-written impl is useful when the
/// operation set is dynamic.
///
/// # Examples
///
/// ```
/// use waypoint_core::{Document, Event, OperationName};
///
/// struct Counter(u32);
///
/// impl Document for Counter {
///     fn invoke(&mut self, operation: &OperationName) -> Option<Event> {
///         match operation.as_str() {
///             "Increment" => {
///                 self.0 += 1;
///                 Some(Event::new("incremented"))
///             }
///             _ => None,
///         }
///     }
///
///     fn supports(&self, operation: &OperationName) -> bool {
///         operation.as_str() == "Increment"
///     }
/// }
///
/// let mut counter = Counter(0);
/// let event = counter.invoke(&OperationName::new("Increment"));
/// assert_eq!(event, Some(Event::new("incremented")));
/// assert_eq!(counter.0, 1);
/// ```
pub trait Document {
    /// Performs `operation` and returns the resulting event.
    ///
    /// Returns `None` when the document does not expose an operation with
    /// that name.
    fn invoke(&mut self, operation: &OperationName) -> Option<Event>;

    /// Returns `true` if `invoke` would recognise `operation`.
    ///
    /// Must agree with `invoke`; verification ahead of a run relies on it.
    fn supports(&self, operation: &OperationName) -> bool;
}

impl<D: Document + ?Sized> Document for &mut D {
    fn invoke(&mut self, operation: &OperationName) -> Option<Event> {
        (**self).invoke(operation)
    }

    fn supports(&self, operation: &OperationName) -> bool {
        (**self).supports(operation)
    }
}

impl<D: Document + ?Sized> Document for Box<D> {
    fn invoke(&mut self, operation: &OperationName) -> Option<Event> {
        (**self).invoke(operation)
    }

    fn supports(&self, operation: &OperationName) -> bool {
        (**self).supports(operation)
    }
}

type Operation<D> = Box<dyn Fn(&mut D) -> Event + Send + Sync>;

/// A registry of named operations for documents of type `D`.
///
/// Operations are registered once and looked up by name at dispatch time,
/// so a plain data type can take part in a workflow without implementing
/// [`Document`] itself. Bind a document with [`OperationTable::bind`].
///
/// # Examples
///
/// ```
/// use waypoint_core::{Document, Event, OperationName, OperationTable};
///
/// struct Order {
///     status: String,
/// }
///
/// let operations = OperationTable::new().with("PlaceOrderHandler", |order: &mut Order| {
///     order.status = "Ordered".to_string();
///     Event::new("ordered")
/// });
///
/// let mut order = Order { status: "Beginning".to_string() };
/// let event = operations
///     .bind(&mut order)
///     .invoke(&OperationName::new("PlaceOrderHandler"));
///
/// assert_eq!(event, Some(Event::new("ordered")));
/// assert_eq!(order.status, "Ordered");
/// ```
pub struct OperationTable<D> {
    operations: HashMap<OperationName, Operation<D>>,
}

impl<D> fmt::Debug for OperationTable<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationTable")
            .field("operations", &self.operations.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<D> Default for OperationTable<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> OperationTable<D> {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self {
            operations: HashMap::new(),
        }
    }

    /// Registers an operation, replacing any previous one with the same name.
    pub fn register<F>(&mut self, name: impl Into<OperationName>, operation: F)
    where
        F: Fn(&mut D) -> Event + Send + Sync + 'static,
    {
        self.operations.insert(name.into(), Box::new(operation));
    }

    /// Chaining form of [`OperationTable::register`].
    pub fn with<F>(mut self, name: impl Into<OperationName>, operation: F) -> Self
    where
        F: Fn(&mut D) -> Event + Send + Sync + 'static,
    {
        self.register(name, operation);
        self
    }

    /// Returns `true` if an operation with the given name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.operations.contains_key(name)
    }

    /// Returns the number of registered operations.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Returns `true` if no operations are registered.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Pairs this table with a document so the pair can be run.
    pub fn bind<'a>(&'a self, document: &'a mut D) -> BoundDocument<'a, D> {
        BoundDocument {
            table: self,
            document,
        }
    }
}

/// A document paired with the [`OperationTable`] that drives it.
pub struct BoundDocument<'a, D> {
    table: &'a OperationTable<D>,
    document: &'a mut D,
}

impl<D> fmt::Debug for BoundDocument<'_, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundDocument")
            .field("table", self.table)
            .finish_non_exhaustive()
    }
}

impl<D> BoundDocument<'_, D> {
    /// Returns the underlying document.
    pub fn document(&self) -> &D {
        &*self.document
    }
}

impl<D> Document for BoundDocument<'_, D> {
    fn invoke(&mut self, operation: &OperationName) -> Option<Event> {
        let op = self.table.operations.get(operation)?;
        Some(op(&mut *self.document))
    }

    fn supports(&self, operation: &OperationName) -> bool {
        self.table.operations.contains_key(operation)
    }
}

/// Implements [`Document`] for a type by mapping operation names to its
/// `fn(&mut self) -> Event` methods.
///
/// # Example
///
/// ```rust
/// use waypoint_core::{document_operations, Document, Event, OperationName};
///
/// struct Order {
///     status: &'static str,
/// }
///
/// impl Order {
///     fn place(&mut self) -> Event {
///         self.status = "Ordered";
///         Event::new("ordered")
///     }
/// }
///
/// document_operations!(Order {
///     "PlaceOrderHandler" => place,
/// });
///
/// let mut order = Order { status: "Beginning" };
/// assert!(order.supports(&OperationName::new("PlaceOrderHandler")));
/// assert!(!order.supports(&OperationName::new("Refund")));
/// assert_eq!(
///     order.invoke(&OperationName::new("PlaceOrderHandler")),
///     Some(Event::new("ordered"))
/// );
/// assert_eq!(order.status, "Ordered");
/// ```
#[macro_export]
macro_rules! document_operations {
    ($doc:ty { $($operation:literal => $method:ident),+ $(,)? }) => {
        impl $crate::Document for $doc {
            fn invoke(
                &mut self,
                operation: &$crate::OperationName,
            ) -> ::core::option::Option<$crate::Event> {
                match operation.as_str() {
                    $($operation => ::core::option::Option::Some(self.$method()),)+
                    _ => ::core::option::Option::None,
                }
            }

            fn supports(&self, operation: &$crate::OperationName) -> bool {
                ::core::matches!(operation.as_str(), $($operation)|+)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Ticket {
        status: String,
        opened: u32,
    }

    impl Ticket {
        fn open(&mut self) -> Event {
            self.opened += 1;
            self.status = "Open".to_string();
            Event::START
        }

        fn close(&mut self) -> Event {
            self.status = "Closed".to_string();
            Event::new("closed")
        }
    }

    document_operations!(Ticket {
        "OpenHandler" => open,
        "CloseHandler" => close,
    });

    #[test]
    fn test_macro_dispatch() {
        let mut ticket = Ticket::default();

        assert_eq!(
            ticket.invoke(&OperationName::new("OpenHandler")),
            Some(Event::START)
        );
        assert_eq!(ticket.status, "Open");
        assert_eq!(
            ticket.invoke(&OperationName::new("CloseHandler")),
            Some(Event::new("closed"))
        );
        assert_eq!(ticket.status, "Closed");
        assert_eq!(ticket.invoke(&OperationName::new("Reopen")), None);
    }

    #[test]
    fn test_macro_supports() {
        let ticket = Ticket::default();
        assert!(ticket.supports(&OperationName::new("OpenHandler")));
        assert!(ticket.supports(&OperationName::new("CloseHandler")));
        assert!(!ticket.supports(&OperationName::new("openhandler")));
    }

    #[test]
    fn test_operation_table_overwrite() {
        let mut table = OperationTable::<Ticket>::new();
        table.register("Open", |t: &mut Ticket| t.open());
        table.register("Open", |_: &mut Ticket| Event::new("replaced"));

        assert_eq!(table.len(), 1);
        assert!(table.contains("Open"));

        let mut ticket = Ticket::default();
        let event = table.bind(&mut ticket).invoke(&OperationName::new("Open"));
        assert_eq!(event, Some(Event::new("replaced")));
        assert_eq!(ticket.opened, 0);
    }

    #[test]
    fn test_bound_document_unknown_operation() {
        let table = OperationTable::<Ticket>::new().with("Open", Ticket::open);
        let mut ticket = Ticket::default();
        let mut bound = table.bind(&mut ticket);

        assert!(bound.supports(&OperationName::new("Open")));
        assert!(!bound.supports(&OperationName::new("Close")));
        assert_eq!(bound.invoke(&OperationName::new("Close")), None);
        assert_eq!(bound.invoke(&OperationName::new("Open")), Some(Event::START));
        assert_eq!(bound.document().opened, 1);
    }

    #[test]
    fn test_forwarding_impls() {
        let mut boxed: Box<dyn Document> = Box::new(Ticket::default());
        assert_eq!(
            boxed.invoke(&OperationName::new("CloseHandler")),
            Some(Event::new("closed"))
        );

        let mut ticket = Ticket::default();
        let mut by_ref = &mut ticket;
        assert_eq!(
            Document::invoke(&mut by_ref, &OperationName::new("OpenHandler")),
            Some(Event::START)
        );
        assert_eq!(ticket.opened, 1);
    }
}
