use std::fmt;
use std::rc::Rc;

pub use kurbo::{Point, Rect, Size};

/// Identity of a node, unique within one page root.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Logical object identity used by hit targets and event handlers.
///
/// Several draw nodes may share one object id; the router only sees the id.
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct ObjectId(pub String);

impl ObjectId {
    /// Borrow the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ObjectId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for ObjectId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<u64> for ObjectId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

/// A configuration value that is either fixed or recomputed on every read.
///
/// Producers run each time [`Value::resolve`] is called; nothing is cached.
pub enum Value<T> {
    /// Fixed value.
    Literal(T),
    /// Zero-argument producer evaluated on read.
    Computed(Rc<dyn Fn() -> T>),
}

impl<T: Clone> Value<T> {
    /// Wrap a producer closure.
    pub fn computed(f: impl Fn() -> T + 'static) -> Self {
        Self::Computed(Rc::new(f))
    }

    /// Current value.
    pub fn resolve(&self) -> T {
        match self {
            Self::Literal(v) => v.clone(),
            Self::Computed(f) => f(),
        }
    }

    /// Return `true` when the value is backed by a producer.
    pub fn is_computed(&self) -> bool {
        matches!(self, Self::Computed(_))
    }
}

impl<T: Clone> Clone for Value<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Literal(v) => Self::Literal(v.clone()),
            Self::Computed(f) => Self::Computed(Rc::clone(f)),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Value<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(v) => f.debug_tuple("Literal").field(v).finish(),
            Self::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

impl<T: Default> Default for Value<T> {
    fn default() -> Self {
        Self::Literal(T::default())
    }
}

impl<T> From<T> for Value<T> {
    fn from(value: T) -> Self {
        Self::Literal(value)
    }
}

impl From<&str> for Value<String> {
    fn from(value: &str) -> Self {
        Self::Literal(value.to_owned())
    }
}

impl From<&str> for Value<ObjectId> {
    fn from(value: &str) -> Self {
        Self::Literal(ObjectId::from(value))
    }
}

impl<'de, T> serde::Deserialize<'de> for Value<T>
where
    T: serde::Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        T::deserialize(deserializer).map(Self::Literal)
    }
}

/// RGBA colour with straight (non-premultiplied) alpha, channels in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Rgba(pub [f64; 4]);

impl Rgba {
    /// Opaque black.
    pub const BLACK: Self = Self([0.0, 0.0, 0.0, 1.0]);
    /// Opaque white.
    pub const WHITE: Self = Self([1.0, 1.0, 1.0, 1.0]);
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self([0.0, 0.0, 0.0, 0.0]);
}

impl Default for Rgba {
    fn default() -> Self {
        Self::BLACK
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
