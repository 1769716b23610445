use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::core::{ScreenPoint, Viewport};
use crate::error::{AtlasError, AtlasResult};
use crate::globe::HubPoint;
use crate::render::{
    Color, LayeredRenderFrame, PolylinePrimitive, RenderFrame, Renderer, SceneLayerKind,
    TextHAlign, TextPrimitive,
};

pub const SHARE_PALETTE: [Color; 5] = [
    Color::hex(0x3b82f6),
    Color::hex(0x8b5cf6),
    Color::hex(0xec4899),
    Color::hex(0xf97316),
    Color::hex(0x10b981),
];

const ARC_STEP_DEG: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShareChartConfig {
    pub viewport: Viewport,
    pub inner_radius: f64,
    pub outer_radius: f64,
    /// Gap between neighbouring segments, in degrees.
    pub padding_angle_deg: f64,
    pub fill_opacity: f64,
    pub caption_color: Color,
}

impl Default for ShareChartConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::new(300, 256),
            inner_radius: 70.0,
            outer_radius: 95.0,
            padding_angle_deg: 10.0,
            fill_opacity: 0.8,
            caption_color: Color::hex(0xffffff),
        }
    }
}

impl ShareChartConfig {
    pub fn validate(&self) -> AtlasResult<()> {
        self.viewport.validate()?;
        if !self.inner_radius.is_finite()
            || !self.outer_radius.is_finite()
            || self.inner_radius < 0.0
            || self.outer_radius <= self.inner_radius
        {
            return Err(AtlasError::InvalidData(
                "donut radii must be finite with 0 <= inner < outer".to_owned(),
            ));
        }
        if !self.padding_angle_deg.is_finite() || !(0.0..360.0).contains(&self.padding_angle_deg) {
            return Err(AtlasError::InvalidData(
                "donut padding angle must be in [0, 360)".to_owned(),
            ));
        }
        if !(0.0..=1.0).contains(&self.fill_opacity) {
            return Err(AtlasError::InvalidData(
                "donut fill opacity must be in [0, 1]".to_owned(),
            ));
        }
        self.caption_color.validate()
    }
}

/// One donut slice. Angles are degrees clockwise from 12 o'clock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareSegment {
    pub label: String,
    pub percentage: f64,
    /// Fraction of the positive total.
    pub share: f64,
    pub start_angle_deg: f64,
    pub end_angle_deg: f64,
    pub color: Color,
}

/// Donut slices in input order.
///
/// Non-positive shares get no slice; a zero total yields no slices at all.
/// Each slice keeps its palette color by input index.
#[must_use]
pub fn share_segments(hubs: &[HubPoint], padding_angle_deg: f64) -> Vec<ShareSegment> {
    let positive = |value: f64| value.is_finite() && value > 0.0;
    let total: f64 = hubs
        .iter()
        .map(|hub| hub.percentage)
        .filter(|value| positive(*value))
        .sum();
    let slices = hubs.iter().filter(|hub| positive(hub.percentage)).count();
    if total <= 0.0 || slices == 0 {
        return Vec::new();
    }

    let available = (360.0 - padding_angle_deg * slices as f64).max(0.0);
    let mut angle = 0.0;
    let mut segments = Vec::with_capacity(slices);
    for (index, hub) in hubs.iter().enumerate() {
        if !positive(hub.percentage) {
            continue;
        }
        let share = hub.percentage / total;
        let sweep = available * share;
        segments.push(ShareSegment {
            label: hub.country.clone(),
            percentage: hub.percentage,
            share,
            start_angle_deg: angle,
            end_angle_deg: angle + sweep,
            color: SHARE_PALETTE[index % SHARE_PALETTE.len()],
        });
        angle += sweep + padding_angle_deg;
    }
    segments
}

/// Hub indices by descending share; ties keep input order.
#[must_use]
pub fn ranked_hubs(hubs: &[HubPoint]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..hubs.len()).collect();
    order.sort_by_key(|index| std::cmp::Reverse(OrderedFloat(hubs[*index].percentage)));
    order
}

/// Consumption-share donut.
#[derive(Debug, Clone)]
pub struct ShareChart {
    config: ShareChartConfig,
    segments: Vec<ShareSegment>,
    region_count: usize,
}

impl ShareChart {
    pub fn new(config: ShareChartConfig, hubs: &[HubPoint]) -> AtlasResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            segments: share_segments(hubs, config.padding_angle_deg),
            region_count: hubs.len(),
        })
    }

    #[must_use]
    pub fn segments(&self) -> &[ShareSegment] {
        &self.segments
    }

    #[must_use]
    pub fn region_count(&self) -> usize {
        self.region_count
    }

    pub fn build_layered_frame(&self) -> AtlasResult<LayeredRenderFrame> {
        let config = &self.config;
        let (cx, cy) = config.viewport.center();
        let mut frame = LayeredRenderFrame::canonical(config.viewport);

        for segment in &self.segments {
            let outline = annular_sector(
                ScreenPoint::new(cx, cy),
                config.inner_radius,
                config.outer_radius,
                segment.start_angle_deg,
                segment.end_angle_deg,
            );
            frame.push_polyline(
                SceneLayerKind::Data,
                PolylinePrimitive::polygon(
                    outline,
                    segment.color.with_alpha(config.fill_opacity),
                    None,
                ),
            );
        }

        frame.push_text(
            SceneLayerKind::Labels,
            TextPrimitive::new(
                self.region_count.to_string(),
                cx,
                cy - 6.0,
                24.0,
                config.caption_color,
                TextHAlign::Center,
            )
            .bold(),
        );
        frame.push_text(
            SceneLayerKind::Labels,
            TextPrimitive::new(
                "REGIONS",
                cx,
                cy + 16.0,
                8.0,
                Color::hex(0x52525b),
                TextHAlign::Center,
            )
            .bold(),
        );
        Ok(frame)
    }

    pub fn build_frame(&self) -> AtlasResult<RenderFrame> {
        Ok(self.build_layered_frame()?.flatten())
    }

    pub fn render<R: Renderer>(&self, renderer: &mut R) -> AtlasResult<()> {
        renderer.render(&self.build_frame()?)
    }
}

/// Outline of a ring slice: outer arc forward, inner arc back.
fn annular_sector(
    center: ScreenPoint,
    inner: f64,
    outer: f64,
    start_deg: f64,
    end_deg: f64,
) -> Vec<ScreenPoint> {
    let sweep = end_deg - start_deg;
    let steps = ((sweep.abs() / ARC_STEP_DEG).ceil() as usize).max(1);
    let at = |radius: f64, deg: f64| {
        let angle = deg.to_radians();
        ScreenPoint::new(center.x + radius * angle.sin(), center.y - radius * angle.cos())
    };

    let mut points = Vec::with_capacity(2 * (steps + 1));
    for i in 0..=steps {
        points.push(at(outer, start_deg + sweep * i as f64 / steps as f64));
    }
    for i in (0..=steps).rev() {
        points.push(at(inner, start_deg + sweep * i as f64 / steps as f64));
    }
    points
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::{SHARE_PALETTE, ShareChart, ShareChartConfig, ranked_hubs, share_segments};
    use crate::core::GeoPoint;
    use crate::globe::HubPoint;

    fn hub(country: &str, percentage: f64) -> HubPoint {
        HubPoint {
            point: GeoPoint::unchecked(0.0, 0.0),
            country: country.to_owned(),
            percentage,
        }
    }

    #[test]
    fn sweeps_are_proportional_after_padding() {
        let hubs = [hub("USA", 50.0), hub("UK", 30.0), hub("Japan", 20.0)];
        let segments = share_segments(&hubs, 10.0);
        assert_eq!(segments.len(), 3);
        // 330° to share out after three 10° gaps.
        assert_abs_diff_eq!(segments[0].end_angle_deg, 165.0, epsilon = 1e-9);
        assert_abs_diff_eq!(segments[1].start_angle_deg, 175.0, epsilon = 1e-9);
        assert_abs_diff_eq!(segments[1].end_angle_deg, 274.0, epsilon = 1e-9);
        assert_abs_diff_eq!(segments[2].end_angle_deg, 350.0, epsilon = 1e-9);
        assert_eq!(segments[2].color, SHARE_PALETTE[2]);
    }

    #[test]
    fn zero_total_yields_no_segments() {
        let hubs = [hub("Nowhere", 0.0), hub("Negative", -5.0)];
        assert!(share_segments(&hubs, 10.0).is_empty());
        assert!(share_segments(&[], 10.0).is_empty());
    }

    #[test]
    fn ranking_is_descending_and_stable() {
        let hubs = [hub("A", 10.0), hub("B", 40.0), hub("C", 10.0), hub("D", 40.0)];
        assert_eq!(ranked_hubs(&hubs), vec![1, 3, 0, 2]);
    }

    #[test]
    fn frame_has_one_polygon_per_segment_and_caption() {
        let hubs = [hub("USA", 60.0), hub("UK", 40.0)];
        let chart = ShareChart::new(ShareChartConfig::default(), &hubs).expect("chart");
        let frame = chart.build_frame().expect("frame");
        assert_eq!(frame.polylines.len(), 2);
        assert_eq!(frame.texts[0].text, "2");
        frame.validate().expect("valid");
    }
}
