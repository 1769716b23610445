use serde::{Deserialize, Serialize};

use crate::core::{GeoPoint, OrthographicProjection, ScreenPoint};
use crate::globe::{GlobeConfig, GlobeGeography};

pub const ORIGIN_LABEL: &str = "BIRTHPLACE";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkerKind {
    Origin,
    /// Index into `GlobeGeography::hubs`.
    Hub(usize),
}

/// Screen placement of one marker glyph and its label.
///
/// Hidden markers keep their last computed position; only `visible` flips.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerPlacement {
    pub kind: MarkerKind,
    pub geo: GeoPoint,
    pub label: String,
    pub radius: f64,
    pub visible: bool,
    pub point: ScreenPoint,
    pub label_anchor: ScreenPoint,
}

/// Builds placements for the origin followed by every hub.
#[must_use]
pub fn place_markers(
    geography: &GlobeGeography,
    projection: &OrthographicProjection,
    config: &GlobeConfig,
) -> Vec<MarkerPlacement> {
    let origin = std::iter::once((
        MarkerKind::Origin,
        geography.origin,
        ORIGIN_LABEL.to_owned(),
        config.style.origin_radius,
    ));
    let hubs = geography.hubs.iter().enumerate().map(|(index, hub)| {
        (
            MarkerKind::Hub(index),
            hub.point,
            hub.country.to_uppercase(),
            config.style.hub_radius,
        )
    });

    origin
        .chain(hubs)
        .map(|(kind, geo, label, radius)| {
            let point = projection.project_unclipped(geo);
            MarkerPlacement {
                kind,
                geo,
                label,
                radius,
                visible: false,
                point,
                label_anchor: ScreenPoint::new(point.x, point.y - config.label_offset_px),
            }
        })
        .map(|mut marker| {
            update_marker(&mut marker, projection, config);
            marker
        })
        .collect()
}

/// Re-evaluates visibility and position after a rotation change.
pub fn update_marker(
    marker: &mut MarkerPlacement,
    projection: &OrthographicProjection,
    config: &GlobeConfig,
) {
    let within = projection.is_within(marker.geo, config.visibility_threshold_rad);
    match projection.project(marker.geo) {
        Some(point) if within => {
            marker.visible = true;
            marker.point = point;
            marker.label_anchor = ScreenPoint::new(point.x, point.y - config.label_offset_px);
        }
        _ => marker.visible = false,
    }
}

/// Topmost visible marker whose glyph contains `(x, y)`.
///
/// Hubs draw over the origin, so later markers win.
#[must_use]
pub fn marker_at(markers: &[MarkerPlacement], x: f64, y: f64) -> Option<&MarkerPlacement> {
    let probe = ScreenPoint::new(x, y);
    markers
        .iter()
        .rev()
        .find(|marker| marker.visible && marker.point.distance_to(probe) <= marker.radius)
}

#[cfg(test)]
mod tests {
    use super::{MarkerKind, ORIGIN_LABEL, marker_at, place_markers};
    use crate::core::{GeoPoint, OrthographicProjection, ScreenPoint};
    use crate::globe::{GlobeConfig, GlobeGeography, HubPoint};

    fn geography() -> GlobeGeography {
        GlobeGeography::new(
            GeoPoint::unchecked(0.0, 0.0),
            Vec::new(),
            vec![
                HubPoint {
                    point: GeoPoint::unchecked(2.0, 0.0),
                    country: "France".to_owned(),
                    percentage: 40.0,
                },
                HubPoint {
                    point: GeoPoint::unchecked(180.0, 0.0),
                    country: "Fiji".to_owned(),
                    percentage: 10.0,
                },
            ],
        )
    }

    #[test]
    fn far_side_markers_are_hidden_but_kept() {
        let config = GlobeConfig::default();
        let projection =
            OrthographicProjection::new(100.0, ScreenPoint::new(200.0, 200.0), [0.0, 0.0])
                .expect("projection");
        let markers = place_markers(&geography(), &projection, &config);

        assert_eq!(markers.len(), 3);
        assert_eq!(markers[0].kind, MarkerKind::Origin);
        assert_eq!(markers[0].label, ORIGIN_LABEL);
        assert!(markers[0].visible);
        assert_eq!(markers[0].point, ScreenPoint::new(200.0, 200.0));
        assert_eq!(markers[0].label_anchor, ScreenPoint::new(200.0, 185.0));
        assert_eq!(markers[1].label, "FRANCE");
        assert!(markers[1].visible);
        assert_eq!(markers[2].kind, MarkerKind::Hub(1));
        assert!(!markers[2].visible);
    }

    #[test]
    fn hit_test_prefers_topmost_visible_marker() {
        let config = GlobeConfig::default();
        let projection =
            OrthographicProjection::new(100.0, ScreenPoint::new(200.0, 200.0), [0.0, 0.0])
                .expect("projection");
        let markers = place_markers(&geography(), &projection, &config);

        // The France hub sits ~3.5 px east of the origin; both glyphs overlap.
        let hit = marker_at(&markers, 201.0, 200.0).expect("hit");
        assert_eq!(hit.kind, MarkerKind::Hub(0));
        assert!(marker_at(&markers, 350.0, 350.0).is_none());
    }
}
