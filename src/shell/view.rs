use serde::Serialize;

use crate::config::AtlasConfig;
use crate::error::AtlasResult;
use crate::globe::{FrameScheduler, GlobeGeography, GlobeRenderer, HubPoint};
use crate::narrative::{CulturalInsight, FoodReport, IngredientEvolution, RegionalVariation};
use crate::radar::{RadarChart, ShareChart, ranked_hubs};

const UNIVERSAL_SOUL: &str = "Universal";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyInsight {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HubShare {
    pub country: String,
    pub percentage: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TimelineKind {
    Genesis,
    Milestone,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineEntry {
    pub kind: TimelineKind,
    /// Origin era for the genesis card, the step year otherwise.
    pub when: String,
    pub location: String,
    pub title: String,
    pub body: String,
}

/// Flavor radar, share donut and ingredient shifts.
#[derive(Debug)]
pub struct StatsSection {
    pub radar: RadarChart,
    pub share: ShareChart,
    /// Hubs by descending share.
    pub hub_ranking: Vec<HubShare>,
    pub ingredient_shifts: Vec<IngredientEvolution>,
}

/// Everything the host displays for one successful report.
#[derive(Debug)]
pub struct ReportView<S: FrameScheduler> {
    pub food_name: String,
    pub globe: GlobeRenderer<S>,
    pub key_insights: Vec<KeyInsight>,
    pub cultural_insights: Vec<CulturalInsight>,
    pub stats: StatsSection,
    pub timeline: Vec<TimelineEntry>,
    /// Span shown over the timeline, from the origin era to the present.
    pub historical_span: String,
    pub regional_variations: Vec<RegionalVariation>,
}

impl<S: FrameScheduler> ReportView<S> {
    pub fn build(report: &FoodReport, config: &AtlasConfig, scheduler: S) -> AtlasResult<Self> {
        let geography = GlobeGeography::from_report(report)?;
        let globe = GlobeRenderer::new(geography, config.globe, scheduler)?;
        let radar = RadarChart::from_profile(config.radar, &report.flavor_profile)?;
        let share = ShareChart::new(config.share, &globe.geography().hubs)?;
        let hub_ranking = hub_ranking(&globe.geography().hubs);

        Ok(Self {
            food_name: report.food_name.clone(),
            globe,
            key_insights: key_insights(report),
            cultural_insights: report.cultural_significance.clone(),
            stats: StatsSection {
                radar,
                share,
                hub_ranking,
                ingredient_shifts: report.ingredient_evolution.clone(),
            },
            timeline: timeline(report),
            historical_span: format!("{} - Present", report.origin.era),
            regional_variations: report.regional_variations.clone(),
        })
    }

    /// Advances every animated section.
    pub fn advance(&mut self, delta_ms: f64) -> bool {
        let globe = self.globe.advance(delta_ms);
        let radar = self.stats.radar.advance(delta_ms);
        globe || radar
    }
}

/// Origin era, main root, cultural soul and global reach.
#[must_use]
pub fn key_insights(report: &FoodReport) -> Vec<KeyInsight> {
    let soul = report
        .cultural_significance
        .first()
        .map(|insight| insight.region.trim())
        .filter(|region| !region.is_empty())
        .unwrap_or(UNIVERSAL_SOUL);
    vec![
        KeyInsight {
            label: "Origin Era",
            value: report.origin.era.clone(),
        },
        KeyInsight {
            label: "Main Root",
            value: report.origin.location.clone(),
        },
        KeyInsight {
            label: "Cultural Soul",
            value: soul.to_owned(),
        },
        KeyInsight {
            label: "Global Reach",
            value: format!("{} Major Hubs", report.consumption_hubs.len()),
        },
    ]
}

fn hub_ranking(hubs: &[HubPoint]) -> Vec<HubShare> {
    ranked_hubs(hubs)
        .into_iter()
        .map(|index| HubShare {
            country: hubs[index].country.clone(),
            percentage: hubs[index].percentage,
        })
        .collect()
}

/// Genesis card followed by the evolution steps in order.
#[must_use]
pub fn timeline(report: &FoodReport) -> Vec<TimelineEntry> {
    let genesis = TimelineEntry {
        kind: TimelineKind::Genesis,
        when: report.origin.era.clone(),
        location: report.origin.location.clone(),
        title: "The Genesis".to_owned(),
        body: report.origin.summary.clone(),
    };
    std::iter::once(genesis)
        .chain(report.evolution_steps.iter().map(|step| TimelineEntry {
            kind: TimelineKind::Milestone,
            when: step.year.clone(),
            location: step.location.clone(),
            title: step.event.clone(),
            body: step.description.clone(),
        }))
        .collect()
}
