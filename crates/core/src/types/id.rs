//! Newtype ID for catalog products.
//!
//! Product IDs are assigned by the remote catalog. Wrapping them keeps a
//! product ID from being confused with a quantity or an index.

use core::fmt;
use core::num::ParseIntError;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Externally assigned, stable product identifier.
///
/// Serialized transparently as the underlying integer, matching the catalog
/// API's `id` field.
///
/// ```rust
/// # use pineapple_stall_core::ProductId;
/// let id: ProductId = "7".parse().unwrap();
/// assert_eq!(id, ProductId::new(7));
/// assert_eq!(id.to_string(), "7");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(i64);

impl ProductId {
    /// Create a new ID from an i64 value.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the underlying i64 value.
    #[must_use]
    pub const fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ProductId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}
