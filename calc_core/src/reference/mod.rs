//! # Reference Tables
//!
//! Read-only lookup data the calculators are built on: cable ampacity and
//! voltage-drop figures, insulation conductivities and costs, and the
//! maximum U-values permitted by building regulations.
//!
//! Each table has a built-in default held in a `Lazy` static. Engines borrow
//! a table at construction rather than reading the static, so callers can
//! inject their own data (a different cable type, a regional cost list).
//!
//! ## Example
//!
//! ```rust
//! use calc_core::reference::{DEFAULT_AMPACITY, DEFAULT_MATERIALS};
//! use calc_core::units::Amps;
//!
//! let lookup = DEFAULT_AMPACITY.resolve(Amps(20.0));
//! assert_eq!(lookup.size.0, 4.0);
//!
//! let wool = DEFAULT_MATERIALS.get("mineral-wool").unwrap();
//! assert_eq!(wool.lambda_w_mk, 0.044);
//! ```

pub mod ampacity;
pub mod insulation;
pub mod regulation;

pub use ampacity::{
    AmpacityRow, AmpacityTable, SizeLookup, VoltageDropRow, VoltageDropTable, DEFAULT_AMPACITY,
    DEFAULT_VOLTAGE_DROP,
};
pub use insulation::{MaterialProperty, MaterialTable, DEFAULT_MATERIALS};
pub use regulation::{
    BuildCategory, ElementType, RegulationTarget, RegulationTargets, TargetCategory,
    DEFAULT_TARGETS,
};
