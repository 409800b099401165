//! Type-safe identifiers for steps, events and document operations.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

macro_rules! identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Cow<'static, str>);

        impl $name {
            /// Creates a new identifier.
            pub fn new(name: impl Into<String>) -> Self {
                Self(Cow::Owned(name.into()))
            }

            /// Creates an identifier from a static string, usable in `const` items.
            pub const fn from_static(name: &'static str) -> Self {
                Self(Cow::Borrowed(name))
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(Cow::Owned(s))
            }
        }

        impl From<&$name> for $name {
            fn from(s: &$name) -> Self {
                s.clone()
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.as_str() == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.as_str() == *other
            }
        }
    };
}

identifier! {
    /// A named position in a workflow.
    ///
    /// The step decides which handler runs next. A step with no registered
    /// handler is terminal.
    ///
    /// # Examples
    ///
    /// ```
    /// use waypoint_core::StepName;
    ///
    /// let step = StepName::new("PlaceOrder");
    /// assert_eq!(step.as_str(), "PlaceOrder");
    ///
    /// let step: StepName = "CapturePayment".into();
    /// assert_eq!(step, "CapturePayment");
    /// ```
    StepName
}

identifier! {
    /// The named outcome of running a step's handler. Events drive routing.
    Event
}

identifier! {
    /// Name of a zero-argument document operation that yields an [`Event`].
    OperationName
}

impl StepName {
    /// Conventional first step, and the engine's `current` step before any run.
    pub const NEW: StepName = StepName::from_static("new");
}

impl Event {
    /// Conventional event emitted by a workflow's opening handler.
    pub const START: Event = Event::from_static("start");
}
