//! Cable current ratings and voltage-drop figures.
//!
//! The ampacity table is an ascending list of `(max_amps, size)` rows. A
//! current belongs to the first row whose bound it does not exceed (bounds
//! are inclusive); anything above the top bound clamps to the ceiling size.
//!
//! Figures are for two-core PVC twin & earth, clipped direct, and are a
//! simplified approximation: no grouping, ambient or thermal-insulation
//! derating is applied.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::units::{Amps, SqMm};

/// One rated band of the ampacity table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmpacityRow {
    /// Inclusive upper current bound for this size (A)
    pub max_amps: f64,
    /// Minimum conductor size carrying that current
    pub size: SqMm,
}

/// Outcome of resolving a current against the table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeLookup {
    /// Resolved conductor size
    pub size: SqMm,
    /// False when the current exceeded every bound and the ceiling size was used
    pub within_table: bool,
}

/// Ordered current-bound to cable-size table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmpacityTable {
    rows: Vec<AmpacityRow>,
    ceiling: SqMm,
}

/// Built-in ampacity table: 13.5→1.5, 18→2.5, 24→4, 32→6, 41→10, 57→16, 76→25, else 35.
pub static DEFAULT_AMPACITY: Lazy<AmpacityTable> = Lazy::new(|| AmpacityTable {
    rows: [
        (13.5, 1.5),
        (18.0, 2.5),
        (24.0, 4.0),
        (32.0, 6.0),
        (41.0, 10.0),
        (57.0, 16.0),
        (76.0, 25.0),
    ]
    .into_iter()
    .map(|(max_amps, size)| AmpacityRow {
        max_amps,
        size: SqMm(size),
    })
    .collect(),
    ceiling: SqMm(35.0),
});

impl AmpacityTable {
    /// Build a table, checking both columns increase strictly and the
    /// ceiling size is larger than every row.
    pub fn new(rows: Vec<AmpacityRow>, ceiling: SqMm) -> CalcResult<Self> {
        if rows.is_empty() {
            return Err(CalcError::invalid_table("ampacity", "Table has no rows"));
        }
        for pair in rows.windows(2) {
            if pair[1].max_amps <= pair[0].max_amps || pair[1].size <= pair[0].size {
                return Err(CalcError::invalid_table(
                    "ampacity",
                    format!(
                        "Rows must increase in both current and size ({}A/{} then {}A/{})",
                        pair[0].max_amps, pair[0].size, pair[1].max_amps, pair[1].size
                    ),
                ));
            }
        }
        if rows.iter().any(|r| !(r.max_amps > 0.0) || !(r.size.0 > 0.0)) {
            return Err(CalcError::invalid_table("ampacity", "Bounds and sizes must be positive"));
        }
        if rows.last().is_some_and(|last| ceiling <= last.size) {
            return Err(CalcError::invalid_table(
                "ampacity",
                format!("Ceiling size {} must exceed the largest row size", ceiling),
            ));
        }
        Ok(AmpacityTable { rows, ceiling })
    }

    /// Smallest size whose bound is not exceeded by `current`, else the ceiling size.
    pub fn resolve(&self, current: Amps) -> SizeLookup {
        let idx = self.rows.partition_point(|row| row.max_amps < current.0);
        match self.rows.get(idx) {
            Some(row) => SizeLookup {
                size: row.size,
                within_table: true,
            },
            None => SizeLookup {
                size: self.ceiling,
                within_table: false,
            },
        }
    }

    /// Rated bands in ascending order
    pub fn rows(&self) -> &[AmpacityRow] {
        &self.rows
    }

    /// Size returned for currents above the top bound
    pub fn ceiling(&self) -> SqMm {
        self.ceiling
    }

    /// Highest modelled current bound
    pub fn top_bound(&self) -> Amps {
        Amps(self.rows.last().map_or(0.0, |r| r.max_amps))
    }

    /// Every size the table can return, smallest first
    pub fn sizes(&self) -> impl Iterator<Item = SqMm> + '_ {
        self.rows
            .iter()
            .map(|r| r.size)
            .chain(std::iter::once(self.ceiling))
    }
}

/// Voltage drop per amp per metre for one conductor size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VoltageDropRow {
    pub size: SqMm,
    /// Millivolts dropped per amp per metre of run (mV/A/m)
    pub mv_per_amp_metre: f64,
}

/// mV/A/m figures keyed by conductor size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoltageDropTable {
    rows: Vec<VoltageDropRow>,
}

/// Built-in twin & earth voltage-drop figures.
pub static DEFAULT_VOLTAGE_DROP: Lazy<VoltageDropTable> = Lazy::new(|| VoltageDropTable {
    rows: [
        (1.5, 29.0),
        (2.5, 18.0),
        (4.0, 11.0),
        (6.0, 7.3),
        (10.0, 4.4),
        (16.0, 2.8),
        (25.0, 1.75),
        (35.0, 1.25),
    ]
    .into_iter()
    .map(|(size, mv_per_amp_metre)| VoltageDropRow {
        size: SqMm(size),
        mv_per_amp_metre,
    })
    .collect(),
});

impl VoltageDropTable {
    pub fn new(rows: Vec<VoltageDropRow>) -> CalcResult<Self> {
        if rows.iter().any(|r| !(r.mv_per_amp_metre > 0.0)) {
            return Err(CalcError::invalid_table("voltage_drop", "mV/A/m figures must be positive"));
        }
        Ok(VoltageDropTable { rows })
    }

    /// mV/A/m for an exact conductor size, if tabulated
    pub fn mv_per_amp_metre(&self, size: SqMm) -> Option<f64> {
        self.rows
            .iter()
            .find(|r| (r.size.0 - size.0).abs() < 1e-9)
            .map(|r| r.mv_per_amp_metre)
    }

    pub fn rows(&self) -> &[VoltageDropRow] {
        &self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_table_is_valid() {
        let table = &*DEFAULT_AMPACITY;
        assert!(AmpacityTable::new(table.rows().to_vec(), table.ceiling()).is_ok());
        assert_eq!(table.top_bound(), Amps(76.0));
    }

    #[test]
    fn test_bounds_are_inclusive() {
        assert_eq!(DEFAULT_AMPACITY.resolve(Amps(13.5)).size, SqMm(1.5));
        assert_eq!(DEFAULT_AMPACITY.resolve(Amps(13.50001)).size, SqMm(2.5));
        assert_eq!(DEFAULT_AMPACITY.resolve(Amps(32.0)).size, SqMm(6.0));
        assert_eq!(DEFAULT_AMPACITY.resolve(Amps(76.0)).size, SqMm(25.0));
    }

    #[test]
    fn test_above_table_clamps_to_ceiling() {
        let lookup = DEFAULT_AMPACITY.resolve(Amps(120.0));
        assert_eq!(lookup.size, SqMm(35.0));
        assert!(!lookup.within_table);
        assert!(DEFAULT_AMPACITY.resolve(Amps(76.0)).within_table);
    }

    #[test]
    fn test_rejects_non_monotone_rows() {
        let rows = vec![
            AmpacityRow { max_amps: 20.0, size: SqMm(2.5) },
            AmpacityRow { max_amps: 18.0, size: SqMm(4.0) },
        ];
        let err = AmpacityTable::new(rows, SqMm(6.0)).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_TABLE");
    }

    #[test]
    fn test_rejects_small_ceiling() {
        let rows = vec![AmpacityRow { max_amps: 20.0, size: SqMm(2.5) }];
        assert!(AmpacityTable::new(rows, SqMm(2.5)).is_err());
    }

    #[test]
    fn test_sizes_include_ceiling() {
        let sizes: Vec<f64> = DEFAULT_AMPACITY.sizes().map(|s| s.0).collect();
        assert_eq!(sizes, vec![1.5, 2.5, 4.0, 6.0, 10.0, 16.0, 25.0, 35.0]);
    }

    #[test]
    fn test_every_size_has_drop_figure() {
        for size in DEFAULT_AMPACITY.sizes() {
            assert!(DEFAULT_VOLTAGE_DROP.mv_per_amp_metre(size).is_some(), "missing {}", size);
        }
        assert_eq!(DEFAULT_VOLTAGE_DROP.mv_per_amp_metre(SqMm(6.0)), Some(7.3));
        assert_eq!(DEFAULT_VOLTAGE_DROP.mv_per_amp_metre(SqMm(50.0)), None);
    }

    proptest! {
        #[test]
        fn prop_resolved_size_is_monotone(a in 0.0f64..200.0, b in 0.0f64..200.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let small = DEFAULT_AMPACITY.resolve(Amps(lo)).size;
            let large = DEFAULT_AMPACITY.resolve(Amps(hi)).size;
            prop_assert!(small <= large);
        }

        #[test]
        fn prop_resolved_size_carries_current(current in 0.01f64..76.0) {
            let size = DEFAULT_AMPACITY.resolve(Amps(current)).size;
            let row = DEFAULT_AMPACITY
                .rows()
                .iter()
                .find(|r| r.size == size)
                .unwrap();
            prop_assert!(current <= row.max_amps);
        }
    }
}
