//! Self-validating value types.
//!
//! Each type can only be obtained through a constructor that checks its
//! invariant, either from an already-typed Rust value (`new`) or from a raw
//! JSON value handed over by the transport layer (`from_json`). There is no
//! unchecked path.

use std::fmt;

use serde_json::Value;

use super::errors::DomainError;

/// Name of an actor (administrator or customer). Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        if value.is_empty() {
            return Err(invalid_username(&value));
        }
        Ok(Self(value))
    }

    pub fn from_json(value: &Value) -> Result<Self, DomainError> {
        match value {
            Value::String(s) => Self::new(s.as_str()),
            other => Err(invalid_username(other)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn invalid_username(value: &dyn fmt::Display) -> DomainError {
    DomainError::validation(format!("Invalid Username: {}", value))
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Catalog item identifier. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        if id.is_empty() {
            return Err(invalid_item_id(&id));
        }
        Ok(Self(id))
    }

    pub fn from_json(value: &Value) -> Result<Self, DomainError> {
        match value {
            Value::String(s) => Self::new(s.as_str()),
            other => Err(invalid_item_id(other)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn invalid_item_id(value: &dyn fmt::Display) -> DomainError {
    DomainError::validation(format!("Invalid Item id: {}", value))
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unit price of a catalog item: finite and strictly positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemPrice(f64);

impl ItemPrice {
    pub fn new(value: f64) -> Result<Self, DomainError> {
        // NaN fails every comparison, so test the accepted range positively.
        if !(value.is_finite() && value > 0.0) {
            return Err(invalid_price(&value));
        }
        Ok(Self(value))
    }

    pub fn from_json(value: &Value) -> Result<Self, DomainError> {
        match value.as_f64() {
            Some(n) => Self::new(n),
            None => Err(invalid_price(value)),
        }
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

fn invalid_price(value: &dyn fmt::Display) -> DomainError {
    DomainError::validation(format!("Invalid Item Price: {}", value))
}

/// A non-negative whole number of units. Used both for stock levels and for
/// requested quantities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InventoryCount(u64);

impl InventoryCount {
    pub const ZERO: InventoryCount = InventoryCount(0);

    pub fn new(value: i64) -> Result<Self, DomainError> {
        u64::try_from(value)
            .map(Self)
            .map_err(|_| invalid_count(&value))
    }

    /// Accepts JSON integers as well as floats with no fractional part
    /// (`10.0`), mirroring how JSON clients commonly encode whole numbers.
    pub fn from_json(value: &Value) -> Result<Self, DomainError> {
        let Value::Number(n) = value else {
            return Err(invalid_count(value));
        };
        if let Some(v) = n.as_u64() {
            return Ok(Self(v));
        }
        if let Some(v) = n.as_i64() {
            return Self::new(v);
        }
        match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f >= 0.0 && f < u64::MAX as f64 => Ok(Self(f as u64)),
            _ => Err(invalid_count(value)),
        }
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    pub(crate) fn from_raw(value: u64) -> Self {
        Self(value)
    }
}

fn invalid_count(value: &dyn fmt::Display) -> DomainError {
    DomainError::validation(format!("Invalid item inventory amount: {}", value))
}

impl fmt::Display for InventoryCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
