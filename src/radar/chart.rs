use std::f64::consts::{FRAC_PI_2, TAU};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::debug;

use crate::core::{Easing, LinearScale, ScreenPoint, Transition, Viewport};
use crate::error::{AtlasError, AtlasResult};
use crate::narrative::FlavorProfile;
use crate::render::{
    CirclePrimitive, Color, LayeredRenderFrame, LinePrimitive, PolylinePrimitive, RenderFrame,
    Renderer, SceneLayerKind, Stroke, TextHAlign, TextPrimitive,
};

/// Most charts have five axes; more spill to the heap.
pub type RadarValues = SmallVec<[f64; 5]>;
pub type RadarVertices = SmallVec<[ScreenPoint; 5]>;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadarConfig {
    #[serde(default = "default_viewport")]
    pub viewport: Viewport,
    #[serde(default = "default_margin")]
    pub margin: f64,
    /// Value mapped to the outer ring.
    #[serde(default = "default_max_value")]
    pub max_value: f64,
    #[serde(default = "default_level_step")]
    pub level_step: f64,
    /// Axis labels sit at this value along each spoke.
    #[serde(default = "default_label_value")]
    pub label_value: f64,
    #[serde(default = "default_animation_ms")]
    pub animation_ms: f64,
    #[serde(default = "default_easing")]
    pub easing: Easing,
    #[serde(default = "default_fill_opacity_start")]
    pub fill_opacity_start: f64,
    #[serde(default = "default_fill_opacity_end")]
    pub fill_opacity_end: f64,
    #[serde(default = "default_dot_radius")]
    pub dot_radius: f64,
    #[serde(default = "default_accent")]
    pub accent: Color,
    #[serde(default = "default_level_color")]
    pub level_color: Color,
    #[serde(default = "default_spoke_color")]
    pub spoke_color: Color,
    #[serde(default = "default_label_color")]
    pub label_color: Color,
}

impl Default for RadarConfig {
    fn default() -> Self {
        Self {
            viewport: default_viewport(),
            margin: default_margin(),
            max_value: default_max_value(),
            level_step: default_level_step(),
            label_value: default_label_value(),
            animation_ms: default_animation_ms(),
            easing: default_easing(),
            fill_opacity_start: default_fill_opacity_start(),
            fill_opacity_end: default_fill_opacity_end(),
            dot_radius: default_dot_radius(),
            accent: default_accent(),
            level_color: default_level_color(),
            spoke_color: default_spoke_color(),
            label_color: default_label_color(),
        }
    }
}

impl RadarConfig {
    pub fn validate(&self) -> AtlasResult<()> {
        self.viewport.validate()?;
        if self.radius() <= 0.0 {
            return Err(AtlasError::InvalidData(
                "radar margin leaves no room for the chart".to_owned(),
            ));
        }
        for (value, name) in [
            (self.max_value, "max_value"),
            (self.level_step, "level_step"),
            (self.label_value, "label_value"),
            (self.dot_radius, "dot_radius"),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(AtlasError::InvalidData(format!(
                    "radar `{name}` must be finite and > 0"
                )));
            }
        }
        if !self.animation_ms.is_finite() || self.animation_ms < 0.0 {
            return Err(AtlasError::InvalidData(
                "radar animation duration must be finite and >= 0".to_owned(),
            ));
        }
        for color in [
            self.accent,
            self.level_color,
            self.spoke_color,
            self.label_color,
        ] {
            color.validate()?;
        }
        Ok(())
    }

    /// Outer radius in pixels.
    #[must_use]
    pub fn radius(&self) -> f64 {
        f64::from(self.viewport.width.min(self.viewport.height)) / 2.0 - self.margin
    }
}

fn default_viewport() -> Viewport {
    Viewport::new(300, 300)
}

fn default_margin() -> f64 {
    40.0
}

fn default_max_value() -> f64 {
    10.0
}

fn default_level_step() -> f64 {
    2.0
}

fn default_label_value() -> f64 {
    12.0
}

fn default_animation_ms() -> f64 {
    1500.0
}

fn default_easing() -> Easing {
    Easing::ElasticOut
}

fn default_fill_opacity_start() -> f64 {
    0.2
}

fn default_fill_opacity_end() -> f64 {
    0.6
}

fn default_dot_radius() -> f64 {
    4.0
}

fn default_accent() -> Color {
    Color::hex(0x3b82f6)
}

fn default_level_color() -> Color {
    Color::hex(0x333333)
}

fn default_spoke_color() -> Color {
    Color::hex(0x222222)
}

fn default_label_color() -> Color {
    Color::hex(0x71717a)
}

/// Angle of axis `index` out of `count`, with the first axis pointing up.
#[must_use]
pub fn axis_angle(index: usize, count: usize) -> f64 {
    index as f64 * TAU / count as f64 - FRAC_PI_2
}

/// Animated radar (spider) chart.
///
/// Values are not clamped: anything past `max_value` extrapolates beyond the
/// outer ring.
#[derive(Debug, Clone)]
pub struct RadarChart {
    config: RadarConfig,
    scale: LinearScale,
    labels: SmallVec<[String; 5]>,
    values: RadarValues,
    reveal: Transition<1>,
}

impl RadarChart {
    pub fn new(config: RadarConfig) -> AtlasResult<Self> {
        config.validate()?;
        let scale = LinearScale::new((0.0, config.max_value), (0.0, config.radius()))?;
        let reveal = Transition::new([0.0], [1.0], config.animation_ms, config.easing)?;
        Ok(Self {
            config,
            scale,
            labels: SmallVec::new(),
            values: SmallVec::new(),
            reveal,
        })
    }

    pub fn from_profile(config: RadarConfig, profile: &FlavorProfile) -> AtlasResult<Self> {
        let mut chart = Self::new(config)?;
        chart.set_profile(profile)?;
        Ok(chart)
    }

    #[must_use]
    pub fn config(&self) -> &RadarConfig {
        &self.config
    }

    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn set_profile(&mut self, profile: &FlavorProfile) -> AtlasResult<()> {
        self.set_axes(
            FlavorProfile::AXES.iter().map(|label| (*label).to_owned()),
            profile.values(),
        )
    }

    /// Replaces the data and restarts the reveal from the zero polygon.
    pub fn set_axes(
        &mut self,
        labels: impl IntoIterator<Item = String>,
        values: impl IntoIterator<Item = f64>,
    ) -> AtlasResult<()> {
        let labels: SmallVec<[String; 5]> = labels.into_iter().collect();
        let values: RadarValues = values.into_iter().collect();
        if labels.len() != values.len() {
            return Err(AtlasError::InvalidData(format!(
                "radar needs one value per axis: {} labels, {} values",
                labels.len(),
                values.len()
            )));
        }
        if labels.len() < 3 {
            return Err(AtlasError::InvalidData(
                "radar needs at least three axes".to_owned(),
            ));
        }
        if values.iter().any(|value| !value.is_finite()) {
            return Err(AtlasError::InvalidData(
                "radar values must be finite".to_owned(),
            ));
        }

        self.labels = labels;
        self.values = values;
        self.reveal = Transition::new([0.0], [1.0], self.config.animation_ms, self.config.easing)?;
        debug!(axes = self.values.len(), "radar data replaced");
        Ok(())
    }

    /// Advances the reveal. Returns `true` while still animating.
    pub fn advance(&mut self, delta_ms: f64) -> bool {
        self.reveal.advance(delta_ms);
        self.is_animating()
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        !self.reveal.is_finished()
    }

    /// Eased reveal progress. Overshoots 1 while the elastic curve rings.
    #[must_use]
    pub fn reveal_progress(&self) -> f64 {
        self.reveal.value()[0]
    }

    #[must_use]
    pub fn center(&self) -> ScreenPoint {
        let (x, y) = self.config.viewport.center();
        ScreenPoint::new(x, y)
    }

    /// Final vertex distances from the center.
    #[must_use]
    pub fn vertex_radii(&self) -> RadarValues {
        self.values.iter().map(|value| self.scale.apply(*value)).collect()
    }

    /// Final vertex positions.
    #[must_use]
    pub fn vertices(&self) -> RadarVertices {
        self.vertices_at(1.0)
    }

    /// Vertex positions at the current point of the reveal.
    #[must_use]
    pub fn animated_vertices(&self) -> RadarVertices {
        self.vertices_at(self.reveal_progress())
    }

    #[must_use]
    pub fn fill_opacity(&self) -> f64 {
        let start = self.config.fill_opacity_start;
        let end = self.config.fill_opacity_end;
        (start + (end - start) * self.reveal_progress()).clamp(0.0, 1.0)
    }

    pub fn build_layered_frame(&self) -> AtlasResult<LayeredRenderFrame> {
        let config = &self.config;
        let center = self.center();
        let count = self.values.len();
        let mut frame = LayeredRenderFrame::canonical(config.viewport);

        let level_stroke = Stroke::dashed(1.0, config.level_color, 4.0, 4.0);
        let mut level = config.level_step;
        while level <= config.max_value + 1e-9 {
            frame.push_circle(
                SceneLayerKind::Grid,
                CirclePrimitive::new(center.x, center.y, self.scale.apply(level))
                    .with_stroke(level_stroke),
            );
            level += config.level_step;
        }

        let spoke_stroke = Stroke::solid(1.0, config.spoke_color);
        let outer = self.scale.apply(config.max_value);
        let label_radius = self.scale.apply(config.label_value);
        for (index, label) in self.labels.iter().enumerate() {
            let (sin, cos) = axis_angle(index, count).sin_cos();
            frame.push_line(
                SceneLayerKind::Grid,
                LinePrimitive::new(
                    center.x,
                    center.y,
                    center.x + outer * cos,
                    center.y + outer * sin,
                    spoke_stroke,
                ),
            );
            frame.push_text(
                SceneLayerKind::Labels,
                TextPrimitive::new(
                    label.to_uppercase(),
                    center.x + label_radius * cos,
                    center.y + label_radius * sin,
                    10.0,
                    config.label_color,
                    TextHAlign::Center,
                )
                .bold(),
            );
        }

        if count > 0 {
            let vertices = self.animated_vertices();
            frame.push_polyline(
                SceneLayerKind::Data,
                PolylinePrimitive::polygon(
                    vertices.to_vec(),
                    config.accent.with_alpha(self.fill_opacity()),
                    Some(Stroke::solid(2.0, config.accent)),
                ),
            );
            for vertex in &vertices {
                frame.push_circle(
                    SceneLayerKind::Markers,
                    CirclePrimitive::new(vertex.x, vertex.y, config.dot_radius)
                        .with_fill(config.accent),
                );
            }
        }

        Ok(frame)
    }

    pub fn build_frame(&self) -> AtlasResult<RenderFrame> {
        Ok(self.build_layered_frame()?.flatten())
    }

    pub fn render<R: Renderer>(&self, renderer: &mut R) -> AtlasResult<()> {
        renderer.render(&self.build_frame()?)
    }

    fn vertices_at(&self, progress: f64) -> RadarVertices {
        let center = self.center();
        let count = self.values.len();
        self.values
            .iter()
            .enumerate()
            .map(|(index, value)| {
                let radius = self.scale.apply(*value) * progress;
                let (sin, cos) = axis_angle(index, count).sin_cos();
                ScreenPoint::new(center.x + radius * cos, center.y + radius * sin)
            })
            .collect()
    }
}
