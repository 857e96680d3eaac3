use std::fmt;

/// Opaque reference to a result the workflow runtime has not produced yet.
///
/// The data model never resolves a `FutureRef`; it only refuses to build
/// concrete data around one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FutureRef {
    label: String,
}

impl FutureRef {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl fmt::Display for FutureRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Future({})", self.label)
    }
}

/// A value that is either available now or still pending in the workflow graph.
#[derive(Debug, Clone, PartialEq)]
pub enum Value<T> {
    Ready(T),
    Pending(FutureRef),
}

impl<T> Value<T> {
    pub fn pending(label: impl Into<String>) -> Self {
        Value::Pending(FutureRef::new(label))
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Value::Ready(_))
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Value::Pending(_))
    }

    pub fn as_ready(&self) -> Option<&T> {
        match self {
            Value::Ready(v) => Some(v),
            Value::Pending(_) => None,
        }
    }

    pub fn as_pending(&self) -> Option<&FutureRef> {
        match self {
            Value::Ready(_) => None,
            Value::Pending(future) => Some(future),
        }
    }

    pub fn into_ready(self) -> Option<T> {
        match self {
            Value::Ready(v) => Some(v),
            Value::Pending(_) => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Value<U> {
        match self {
            Value::Ready(v) => Value::Ready(f(v)),
            Value::Pending(future) => Value::Pending(future),
        }
    }
}

impl<T> From<T> for Value<T> {
    fn from(v: T) -> Self {
        Value::Ready(v)
    }
}
