//! Regulation Targets
//!
//! Maximum permitted U-values (W/m²K) by building element and build category.
//! New-build work has its own targets; extensions and retrofits share the
//! extension targets.

use std::fmt;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Building element being insulated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    Wall,
    Roof,
    Floor,
}

impl ElementType {
    /// All element variants for UI selection
    pub const ALL: [ElementType; 3] = [ElementType::Wall, ElementType::Roof, ElementType::Floor];

    /// Form code ("wall", "roof", "floor")
    pub fn code(&self) -> &'static str {
        match self {
            ElementType::Wall => "wall",
            ElementType::Roof => "roof",
            ElementType::Floor => "floor",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ElementType::Wall => "Wall",
            ElementType::Roof => "Roof",
            ElementType::Floor => "Floor",
        }
    }

    /// Parse from common string representations
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "wall" | "walls" | "external-wall" => Ok(ElementType::Wall),
            "roof" | "roofs" | "pitched-roof" | "flat-roof" => Ok(ElementType::Roof),
            "floor" | "floors" | "ground-floor" => Ok(ElementType::Floor),
            _ => Err(CalcError::invalid_input(
                "element_type",
                s,
                "Expected one of: wall, roof, floor",
            )),
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Kind of building work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BuildCategory {
    NewBuild,
    Extension,
    Retrofit,
}

impl BuildCategory {
    pub const ALL: [BuildCategory; 3] = [
        BuildCategory::NewBuild,
        BuildCategory::Extension,
        BuildCategory::Retrofit,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            BuildCategory::NewBuild => "new-build",
            BuildCategory::Extension => "extension",
            BuildCategory::Retrofit => "retrofit",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            BuildCategory::NewBuild => "New Build",
            BuildCategory::Extension => "Extension",
            BuildCategory::Retrofit => "Retrofit",
        }
    }

    /// Which target column applies to this kind of work
    pub fn target_category(&self) -> TargetCategory {
        match self {
            BuildCategory::NewBuild => TargetCategory::NewBuild,
            BuildCategory::Extension | BuildCategory::Retrofit => TargetCategory::Extension,
        }
    }

    /// Parse from common string representations
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        match s.trim().to_lowercase().replace([' ', '_'], "-").as_str() {
            "new-build" | "newbuild" | "new" => Ok(BuildCategory::NewBuild),
            "extension" | "ext" => Ok(BuildCategory::Extension),
            "retrofit" | "refurbishment" | "renovation" => Ok(BuildCategory::Retrofit),
            _ => Err(CalcError::invalid_input(
                "build_category",
                s,
                "Expected one of: new-build, extension, retrofit",
            )),
        }
    }
}

impl fmt::Display for BuildCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Target column of the regulation table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TargetCategory {
    NewBuild,
    Extension,
}

/// One cell of the regulation table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegulationTarget {
    pub element: ElementType,
    pub category: TargetCategory,
    /// Maximum permitted U-value (W/m²K)
    pub max_u_value: f64,
}

/// (element × target category) to maximum U-value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegulationTargets {
    targets: Vec<RegulationTarget>,
}

/// Built-in targets.
pub static DEFAULT_TARGETS: Lazy<RegulationTargets> = Lazy::new(|| {
    use ElementType::*;
    use TargetCategory as C;
    RegulationTargets {
        targets: [
            (Wall, C::NewBuild, 0.18),
            (Roof, C::NewBuild, 0.11),
            (Floor, C::NewBuild, 0.13),
            (Wall, C::Extension, 0.28),
            (Roof, C::Extension, 0.15),
            (Floor, C::Extension, 0.18),
        ]
        .into_iter()
        .map(|(element, category, max_u_value)| RegulationTarget {
            element,
            category,
            max_u_value,
        })
        .collect(),
    }
});

impl RegulationTargets {
    /// Build a table; every element must have a positive target in both categories.
    pub fn new(targets: Vec<RegulationTarget>) -> CalcResult<Self> {
        let table = RegulationTargets { targets };
        for element in ElementType::ALL {
            for category in [TargetCategory::NewBuild, TargetCategory::Extension] {
                let cell = table
                    .targets
                    .iter()
                    .find(|t| t.element == element && t.category == category)
                    .ok_or_else(|| {
                        CalcError::invalid_table(
                            "regulation",
                            format!("No target for {} ({:?})", element, category),
                        )
                    })?;
                if !(cell.max_u_value > 0.0) {
                    return Err(CalcError::invalid_table(
                        "regulation",
                        format!("Target for {} ({:?}) must be positive", element, category),
                    ));
                }
            }
        }
        Ok(table)
    }

    /// Maximum permitted U-value for the element and kind of work
    pub fn target(&self, element: ElementType, build: BuildCategory) -> CalcResult<f64> {
        let category = build.target_category();
        self.targets
            .iter()
            .find(|t| t.element == element && t.category == category)
            .map(|t| t.max_u_value)
            .ok_or_else(|| {
                CalcError::invalid_table(
                    "regulation",
                    format!("No target for {} ({:?})", element, category),
                )
            })
    }

    pub fn targets(&self) -> &[RegulationTarget] {
        &self.targets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_targets_complete() {
        assert!(RegulationTargets::new(DEFAULT_TARGETS.targets().to_vec()).is_ok());
    }

    #[test]
    fn test_extension_and_retrofit_share_targets() {
        for element in ElementType::ALL {
            assert_eq!(
                DEFAULT_TARGETS.target(element, BuildCategory::Extension).unwrap(),
                DEFAULT_TARGETS.target(element, BuildCategory::Retrofit).unwrap()
            );
        }
        let wall = |category| DEFAULT_TARGETS.target(ElementType::Wall, category).unwrap();
        assert_eq!(wall(BuildCategory::Retrofit), 0.28);
        assert_eq!(wall(BuildCategory::NewBuild), 0.18);
    }

    #[test]
    fn test_incomplete_table_rejected() {
        let partial = DEFAULT_TARGETS.targets()[..5].to_vec();
        assert_eq!(RegulationTargets::new(partial).unwrap_err().error_code(), "INVALID_TABLE");
    }

    #[test]
    fn test_flexible_parsing() {
        assert_eq!(ElementType::from_str_flexible("Wall").unwrap(), ElementType::Wall);
        assert_eq!(BuildCategory::from_str_flexible("New Build").unwrap(), BuildCategory::NewBuild);
        assert_eq!(BuildCategory::from_str_flexible("new_build").unwrap(), BuildCategory::NewBuild);
        assert!(ElementType::from_str_flexible("ceiling").is_err());
    }

    #[test]
    fn test_serialization() {
        assert_eq!(serde_json::to_string(&BuildCategory::NewBuild).unwrap(), "\"new-build\"");
        assert_eq!(serde_json::to_string(&ElementType::Floor).unwrap(), "\"floor\"");
    }
}
