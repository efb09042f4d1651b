//! Fixed-point math for arena positions.
//!
//! Positions live on a single horizontal axis. Fixed-point keeps a
//! seeded tournament byte-identical across platforms, which the
//! determinism checks in the headless runner rely on.

use fixed::types::I32F32;

/// Fixed-point number type for all simulation math.
///
/// Uses 32 bits for integer part and 32 bits for fractional part.
pub type Fixed = I32F32;

/// Serde support for fixed-point numbers.
///
/// Serializes as the raw bit representation (i64) so positions survive a
/// snapshot round trip exactly.
pub mod fixed_serde {
    use super::Fixed;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a fixed-point number as its raw bits.
    pub fn serialize<S>(value: &Fixed, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        value.to_bits().serialize(serializer)
    }

    /// Deserialize a fixed-point number from its raw bits.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Fixed, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bits = i64::deserialize(deserializer)?;
        Ok(Fixed::from_bits(bits))
    }
}

/// Absolute horizontal distance between two positions.
#[must_use]
pub fn horizontal_distance(a: Fixed, b: Fixed) -> Fixed {
    if a > b {
        a - b
    } else {
        b - a
    }
}

/// Direction sign (+1 or -1) pointing from `from` toward `to`.
///
/// Coincident positions point right.
#[must_use]
pub fn direction_toward(from: Fixed, to: Fixed) -> i8 {
    if to >= from {
        1
    } else {
        -1
    }
}
