//! Line item model
//!
//! A line item is one named income or expense row inside a budget.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A named numeric entry under either the expense or income group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Position-derived identifier, unique within its group only
    pub id: i64,

    /// Display name (may be empty while the user is still typing)
    #[serde(default)]
    pub name: String,

    /// Amount, or `None` when the entered text is not a number.
    /// Items without a value contribute nothing to totals.
    #[serde(default)]
    pub value: Option<Decimal>,
}

impl LineItem {
    /// Create a line item with a numeric value
    pub fn new(id: i64, name: impl Into<String>, value: Decimal) -> Self {
        Self {
            id,
            name: name.into(),
            value: Some(value),
        }
    }

    /// Create a line item whose value may be missing
    pub fn with_value(id: i64, name: impl Into<String>, value: Option<Decimal>) -> Self {
        Self {
            id,
            name: name.into(),
            value,
        }
    }

    /// The blank row a fresh budget starts with
    pub fn blank(id: i64) -> Self {
        Self::new(id, "", Decimal::ZERO)
    }

    /// Whether the item carries a usable number
    pub fn is_numeric(&self) -> bool {
        self.value.is_some()
    }
}

impl fmt::Display for LineItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            Some(value) => write!(f, "#{} {}: {}", self.id, self.name, value),
            None => write!(f, "#{} {}: (not a number)", self.id, self.name),
        }
    }
}
