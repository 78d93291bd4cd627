//! # Unit Types
//!
//! Type-safe wrappers for the units the calculators work in. These provide
//! compile-time safety against unit confusion while remaining lightweight
//! (just f64 wrappers that serialize as bare numbers).
//!
//! ## Metric Units
//!
//! - Length: metres (m), millimetres (mm)
//! - Area: square metres (m²), square millimetres (mm², cable cross-section)
//! - Electrical: amps (A), volts (V), kilowatts (kW)
//!
//! ## Example
//!
//! ```rust
//! use calc_core::units::{Amps, Kilowatts, Metres, Millimetres, Volts};
//!
//! let thickness = Millimetres(100.0);
//! let metres: Metres = thickness.into();
//! assert_eq!(metres.0, 0.1);
//!
//! let current: Amps = Kilowatts(7.36).at_voltage(Volts(230.0));
//! assert!((current.0 - 32.0).abs() < 1e-9);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// Length Units
// ============================================================================

/// Length in metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metres(pub f64);

/// Length in millimetres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Millimetres(pub f64);

impl From<Millimetres> for Metres {
    fn from(mm: Millimetres) -> Self {
        Metres(mm.0 / 1000.0)
    }
}

impl From<Metres> for Millimetres {
    fn from(m: Metres) -> Self {
        Millimetres(m.0 * 1000.0)
    }
}

// ============================================================================
// Area Units
// ============================================================================

/// Area in square metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SqM(pub f64);

/// Conductor cross-section in square millimetres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SqMm(pub f64);

impl fmt::Display for SqMm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}mm²", self.0)
    }
}

// ============================================================================
// Electrical Units
// ============================================================================

/// Current in amps
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amps(pub f64);

/// Potential in volts
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Volts(pub f64);

/// Power in kilowatts
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kilowatts(pub f64);

impl Kilowatts {
    /// Current drawn at the given supply voltage: A = kW·1000 / V
    pub fn at_voltage(self, voltage: Volts) -> Amps {
        Amps(self.0 * 1000.0 / voltage.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_millimetres_to_metres() {
        let mm = Millimetres(150.0);
        let m: Metres = mm.into();
        assert_eq!(m.0, 0.15);
    }

    #[test]
    fn test_power_to_current() {
        let amps = Kilowatts(9.2).at_voltage(Volts(230.0));
        assert!((amps.0 - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_cable_size_display() {
        assert_eq!(SqMm(6.0).to_string(), "6mm²");
        assert_eq!(SqMm(1.5).to_string(), "1.5mm²");
    }

    #[test]
    fn test_serialization() {
        let amps = Amps(32.0);
        let json = serde_json::to_string(&amps).unwrap();
        assert_eq!(json, "32.0");

        let roundtrip: Amps = serde_json::from_str(&json).unwrap();
        assert_eq!(amps, roundtrip);
    }
}
