#[cfg(feature = "parallel-projection")]
use rayon::prelude::*;

use crate::core::{OrthographicProjection, ScreenPoint};
use crate::error::AtlasResult;
use crate::globe::markers::MarkerKind;
use crate::globe::{FrameScheduler, GlobeRenderer};
use crate::render::{
    CirclePrimitive, Color, LayeredRenderFrame, PolylinePrimitive, RectPrimitive, RenderFrame,
    Renderer, SceneLayerKind, Stroke, TextHAlign, TextPrimitive,
};
use crate::topology::CountryShape;

pub const LOADING_LABEL: &str = "CALIBRATING GEOGRAPHY";
const LOADING_SPINNER_RADIUS: f64 = 24.0;

impl<S: FrameScheduler> GlobeRenderer<S> {
    /// Materializes the current globe state into draw layers.
    ///
    /// Countries, arcs and markers are only emitted once boundaries are
    /// ready; until then the overlay carries the loading indicator.
    pub fn build_layered_frame(&self) -> AtlasResult<LayeredRenderFrame> {
        let style = &self.config.style;
        let viewport = self.config.viewport;
        let projection = &self.projection;
        let center = projection.translate;
        let mut frame = LayeredRenderFrame::canonical(viewport);

        frame.push_rect(
            SceneLayerKind::Background,
            RectPrimitive::new(
                0.0,
                0.0,
                f64::from(viewport.width),
                f64::from(viewport.height),
                style.background,
            ),
        );
        frame.push_circle(
            SceneLayerKind::Background,
            CirclePrimitive::new(center.x, center.y, projection.scale)
                .with_fill(style.ocean_fill)
                .with_stroke(Stroke::solid(style.ocean_stroke_width, style.ocean_stroke)),
        );
        frame.push_circle(
            SceneLayerKind::Background,
            CirclePrimitive::new(
                center.x,
                center.y,
                projection.scale + style.atmosphere_width_px / 2.0,
            )
            .with_stroke(Stroke::solid(style.atmosphere_width_px, style.atmosphere)),
        );

        let graticule_stroke = Stroke::solid(style.graticule_width, style.graticule);
        for line in &self.graticule {
            for run in projection.project_line(line) {
                frame.push_polyline(
                    SceneLayerKind::Grid,
                    PolylinePrimitive::open(run, graticule_stroke),
                );
            }
        }

        if !self.is_ready() {
            push_loading_indicator(&mut frame, center, style.loading_text, style.arc);
            return Ok(frame);
        }

        let country_stroke = Stroke::solid(style.country_stroke_width, style.country_stroke);
        for ring in project_countries(&self.countries, projection) {
            frame.push_polyline(
                SceneLayerKind::Geography,
                PolylinePrimitive::polygon(ring, style.country_fill, Some(country_stroke)),
            );
        }

        let [on, off] = style.arc_dash;
        let arc_stroke = Stroke::dashed(style.arc_width, style.arc, on, off);
        for path in &self.arc_paths {
            for run in projection.project_line(path) {
                frame.push_polyline(SceneLayerKind::Routes, PolylinePrimitive::open(run, arc_stroke));
            }
        }

        for marker in self.markers.iter().filter(|marker| marker.visible) {
            let (glyph, label_color) = match marker.kind {
                MarkerKind::Origin => (
                    CirclePrimitive::new(marker.point.x, marker.point.y, marker.radius)
                        .with_fill(style.origin_fill)
                        .with_stroke(Stroke::solid(style.origin_stroke_width, style.origin_stroke)),
                    style.origin_fill,
                ),
                MarkerKind::Hub(_) => (
                    CirclePrimitive::new(marker.point.x, marker.point.y, marker.radius)
                        .with_fill(style.hub_color.with_alpha(style.hub_fill_opacity))
                        .with_stroke(Stroke::solid(style.hub_stroke_width, style.hub_color)),
                    style.hub_color,
                ),
            };
            frame.push_circle(SceneLayerKind::Markers, glyph);
            frame.push_text(
                SceneLayerKind::Labels,
                TextPrimitive::new(
                    marker.label.clone(),
                    marker.label_anchor.x,
                    marker.label_anchor.y,
                    style.label_font_size_px,
                    label_color,
                    TextHAlign::Center,
                )
                .bold(),
            );
        }

        Ok(frame)
    }

    pub fn build_frame(&self) -> AtlasResult<RenderFrame> {
        Ok(self.build_layered_frame()?.flatten())
    }

    pub fn render<R: Renderer>(&self, renderer: &mut R) -> AtlasResult<()> {
        let frame = self.build_frame()?;
        renderer.render(&frame)
    }
}

fn push_loading_indicator(
    frame: &mut LayeredRenderFrame,
    center: ScreenPoint,
    text: Color,
    accent: Color,
) {
    frame.push_circle(
        SceneLayerKind::Overlay,
        CirclePrimitive::new(center.x, center.y - LOADING_SPINNER_RADIUS, LOADING_SPINNER_RADIUS)
            .with_stroke(Stroke::dashed(2.0, accent, 12.0, 6.0)),
    );
    frame.push_text(
        SceneLayerKind::Overlay,
        TextPrimitive::new(
            LOADING_LABEL,
            center.x,
            center.y + LOADING_SPINNER_RADIUS,
            10.0,
            text,
            TextHAlign::Center,
        )
        .bold(),
    );
}

/// Projects every country ring, dropping rings entirely on the far side.
fn project_countries(
    countries: &[CountryShape],
    projection: &OrthographicProjection,
) -> Vec<Vec<ScreenPoint>> {
    // Each ring projects independently, so large datasets split well across
    // worker threads.
    #[cfg(feature = "parallel-projection")]
    {
        countries
            .par_iter()
            .flat_map_iter(|country| {
                country
                    .rings
                    .iter()
                    .filter_map(|ring| projection.project_ring(ring))
            })
            .collect()
    }

    #[cfg(not(feature = "parallel-projection"))]
    {
        countries
            .iter()
            .flat_map(|country| {
                country
                    .rings
                    .iter()
                    .filter_map(|ring| projection.project_ring(ring))
            })
            .collect()
    }
}
