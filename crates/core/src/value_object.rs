//! Value object trait: equality by value, not identity.
//!
//! Value objects have **no identity**: they are defined entirely by their
//! attribute values (a set of sizes, a classification code). Two value objects
//! with the same values are interchangeable.

/// Marker trait for value objects.
///
/// Value objects are **immutable** once built and **compared by value**. To
/// "modify" one, build a new one.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct ClassificationCode(String);
///
/// impl ValueObject for ClassificationCode {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
