//! Condition expressions for conditional writes
//!
//! A [`Condition`] is evaluated by the store against the item currently held
//! under the written key. An absent item behaves as an item with no
//! attributes: `AttributeNotExists` holds, and every comparison is false.
//! Comparisons use text order, which is why timestamps are stored in a
//! fixed-width sortable encoding.

use crate::store::item::Item;
use std::fmt;

/// Predicate over the existing item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    AttributeExists(String),
    AttributeNotExists(String),
    Equals(String, String),
    NotEquals(String, String),
    LessThan(String, String),
    GreaterThan(String, String),
    And(Box<Condition>, Box<Condition>),
    Or(Box<Condition>, Box<Condition>),
    Not(Box<Condition>),
}

impl Condition {
    pub fn exists(attribute: impl Into<String>) -> Self {
        Condition::AttributeExists(attribute.into())
    }

    pub fn not_exists(attribute: impl Into<String>) -> Self {
        Condition::AttributeNotExists(attribute.into())
    }

    pub fn equals(attribute: impl Into<String>, value: impl Into<String>) -> Self {
        Condition::Equals(attribute.into(), value.into())
    }

    pub fn not_equals(attribute: impl Into<String>, value: impl Into<String>) -> Self {
        Condition::NotEquals(attribute.into(), value.into())
    }

    pub fn less_than(attribute: impl Into<String>, value: impl Into<String>) -> Self {
        Condition::LessThan(attribute.into(), value.into())
    }

    pub fn greater_than(attribute: impl Into<String>, value: impl Into<String>) -> Self {
        Condition::GreaterThan(attribute.into(), value.into())
    }

    pub fn and(self, other: Condition) -> Self {
        Condition::And(Box::new(self), Box::new(other))
    }

    pub fn or(self, other: Condition) -> Self {
        Condition::Or(Box::new(self), Box::new(other))
    }

    pub fn negate(self) -> Self {
        Condition::Not(Box::new(self))
    }

    /// Evaluate against the current item, `None` when no item exists
    pub fn evaluate(&self, item: Option<&Item>) -> bool {
        let value = |name: &str| item.and_then(|i| i.get(name));
        match self {
            Condition::AttributeExists(name) => value(name).is_some(),
            Condition::AttributeNotExists(name) => value(name).is_none(),
            Condition::Equals(name, expected) => value(name).is_some_and(|v| v == expected),
            // NotEquals on a missing attribute holds, matching key-value store semantics
            Condition::NotEquals(name, expected) => value(name).map_or(true, |v| v != expected),
            Condition::LessThan(name, bound) => value(name).is_some_and(|v| v < bound),
            Condition::GreaterThan(name, bound) => value(name).is_some_and(|v| v > bound),
            Condition::And(left, right) => left.evaluate(item) && right.evaluate(item),
            Condition::Or(left, right) => left.evaluate(item) || right.evaluate(item),
            Condition::Not(inner) => !inner.evaluate(item),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::AttributeExists(name) => write!(f, "attribute_exists({})", name),
            Condition::AttributeNotExists(name) => write!(f, "attribute_not_exists({})", name),
            Condition::Equals(name, value) => write!(f, "{} = {:?}", name, value),
            Condition::NotEquals(name, value) => write!(f, "{} <> {:?}", name, value),
            Condition::LessThan(name, value) => write!(f, "{} < {:?}", name, value),
            Condition::GreaterThan(name, value) => write!(f, "{} > {:?}", name, value),
            Condition::And(left, right) => write!(f, "({} AND {})", left, right),
            Condition::Or(left, right) => write!(f, "({} OR {})", left, right),
            Condition::Not(inner) => write!(f, "NOT {}", inner),
        }
    }
}
