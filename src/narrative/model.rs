use serde::{Deserialize, Serialize};

use crate::core::GeoPoint;
use crate::error::{AtlasError, AtlasResult};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    /// Converts to a validated longitude-first point.
    pub fn to_geo_point(self) -> AtlasResult<GeoPoint> {
        GeoPoint::new(self.lng, self.lat)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Origin {
    pub location: String,
    pub era: String,
    pub coordinates: Coordinate,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolutionStep {
    pub year: String,
    pub location: String,
    pub event: String,
    pub description: String,
    pub coordinates: Coordinate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumptionHub {
    pub country: String,
    pub percentage: f64,
    pub coordinates: Coordinate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientEvolution {
    pub original: String,
    pub modern: String,
    pub reason: String,
}

/// Five flavor intensities, nominally on a 0..=10 scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlavorProfile {
    pub sweet: f64,
    pub savory: f64,
    pub spicy: f64,
    pub sour: f64,
    pub bitter: f64,
}

impl FlavorProfile {
    pub const AXES: [&'static str; 5] = ["Sweet", "Savory", "Spicy", "Sour", "Bitter"];

    /// Values in `AXES` order.
    #[must_use]
    pub fn values(self) -> [f64; 5] {
        [self.sweet, self.savory, self.spicy, self.sour, self.bitter]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CulturalInsight {
    pub region: String,
    pub meaning: String,
    pub tradition: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionalVariation {
    pub name: String,
    pub region: String,
    pub key_difference: String,
    pub popularity: String,
}

/// Structured history of one dish, as returned by the narrative backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodReport {
    pub food_name: String,
    pub origin: Origin,
    pub evolution_steps: Vec<EvolutionStep>,
    pub consumption_hubs: Vec<ConsumptionHub>,
    pub ingredient_evolution: Vec<IngredientEvolution>,
    pub flavor_profile: FlavorProfile,
    pub cultural_significance: Vec<CulturalInsight>,
    pub regional_variations: Vec<RegionalVariation>,
}

impl FoodReport {
    /// Range checks that the JSON schema alone cannot express.
    ///
    /// Failures are reported as `SchemaMismatch`.
    pub fn validate(&self) -> AtlasResult<()> {
        check_coordinate("origin", self.origin.coordinates)?;
        for (index, step) in self.evolution_steps.iter().enumerate() {
            check_coordinate(&format!("evolutionSteps[{index}]"), step.coordinates)?;
        }
        for (index, hub) in self.consumption_hubs.iter().enumerate() {
            check_coordinate(&format!("consumptionHubs[{index}]"), hub.coordinates)?;
            if !hub.percentage.is_finite() {
                return Err(AtlasError::SchemaMismatch(format!(
                    "consumptionHubs[{index}].percentage must be finite"
                )));
            }
        }
        for (axis, value) in FlavorProfile::AXES
            .iter()
            .zip(self.flavor_profile.values())
        {
            if !value.is_finite() {
                return Err(AtlasError::SchemaMismatch(format!(
                    "flavorProfile.{} must be finite",
                    axis.to_lowercase()
                )));
            }
        }
        Ok(())
    }
}

fn check_coordinate(path: &str, coordinate: Coordinate) -> AtlasResult<()> {
    coordinate
        .to_geo_point()
        .map(|_| ())
        .map_err(|err| AtlasError::SchemaMismatch(format!("{path}.coordinates: {err}")))
}
