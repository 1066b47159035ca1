//! The seven semantic order fields.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A recognized input field.
///
/// Declaration order is vector order: each field's position in the
/// assembled feature vector is its index in [`Field::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Fulfilment,
    SalesChannel,
    Category,
    Size,
    ShipState,
    B2b,
    Qty,
}

impl Field {
    /// All fields, in vector order.
    pub const ALL: [Field; 7] = [
        Field::Fulfilment,
        Field::SalesChannel,
        Field::Category,
        Field::Size,
        Field::ShipState,
        Field::B2b,
        Field::Qty,
    ];

    /// Number of signal-bearing positions at the head of every feature vector.
    pub const COUNT: usize = Self::ALL.len();

    /// Fixed position in the feature vector.
    pub fn position(self) -> usize {
        self as usize
    }

    /// Key used in request bodies.
    pub fn name(self) -> &'static str {
        match self {
            Self::Fulfilment => "fulfilment",
            Self::SalesChannel => "sales_channel",
            Self::Category => "category",
            Self::Size => "size",
            Self::ShipState => "ship_state",
            Self::B2b => "b2b",
            Self::Qty => "qty",
        }
    }

    /// Human-readable label for form population.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Fulfilment => "Fulfilment",
            Self::SalesChannel => "Sales Channel",
            Self::Category => "Category",
            Self::Size => "Size",
            Self::ShipState => "Ship State",
            Self::B2b => "B2B",
            Self::Qty => "Quantity",
        }
    }

    /// Value used when the field is absent from a request.
    pub fn default_value(self) -> f64 {
        match self {
            Self::Qty => 1.0,
            _ => 0.0,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.name() == s)
            .ok_or_else(|| format!("unknown field: {s}"))
    }
}
