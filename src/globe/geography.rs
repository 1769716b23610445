use serde::{Deserialize, Serialize};

use crate::core::GeoPoint;
use crate::error::AtlasResult;
use crate::narrative::FoodReport;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HubPoint {
    pub point: GeoPoint,
    pub country: String,
    pub percentage: f64,
}

/// The geographic part of a report: where the dish started, where it went,
/// and where it is eaten today.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobeGeography {
    pub origin: GeoPoint,
    pub origin_location: String,
    /// Evolution steps in chronological order.
    pub milestones: Vec<GeoPoint>,
    pub hubs: Vec<HubPoint>,
}

impl GlobeGeography {
    #[must_use]
    pub fn new(origin: GeoPoint, milestones: Vec<GeoPoint>, hubs: Vec<HubPoint>) -> Self {
        Self {
            origin,
            origin_location: String::new(),
            milestones,
            hubs,
        }
    }

    pub fn from_report(report: &FoodReport) -> AtlasResult<Self> {
        let milestones = report
            .evolution_steps
            .iter()
            .map(|step| step.coordinates.to_geo_point())
            .collect::<AtlasResult<Vec<_>>>()?;
        let hubs = report
            .consumption_hubs
            .iter()
            .map(|hub| {
                Ok(HubPoint {
                    point: hub.coordinates.to_geo_point()?,
                    country: hub.country.clone(),
                    percentage: hub.percentage,
                })
            })
            .collect::<AtlasResult<Vec<_>>>()?;

        Ok(Self {
            origin: report.origin.coordinates.to_geo_point()?,
            origin_location: report.origin.location.clone(),
            milestones,
            hubs,
        })
    }

    /// Consecutive `(from, to)` pairs of the migration path starting at the
    /// origin.
    #[must_use]
    pub fn route_legs(&self) -> Vec<(GeoPoint, GeoPoint)> {
        let mut legs = Vec::with_capacity(self.milestones.len());
        let mut current = self.origin;
        for next in &self.milestones {
            legs.push((current, *next));
            current = *next;
        }
        legs
    }
}
