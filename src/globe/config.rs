use serde::{Deserialize, Serialize};

use crate::core::{Easing, GraticuleSpec, MARKER_VISIBILITY_THRESHOLD_RAD, Viewport};
use crate::error::{AtlasError, AtlasResult};
use crate::interaction::KineticRotationConfig;
use crate::render::Color;

/// Colors and stroke widths of the globe scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlobeStyle {
    pub background: Color,
    pub ocean_fill: Color,
    pub ocean_stroke: Color,
    pub ocean_stroke_width: f64,
    /// Halo drawn just outside the ocean disc.
    pub atmosphere: Color,
    pub atmosphere_width_px: f64,
    pub graticule: Color,
    pub graticule_width: f64,
    pub country_fill: Color,
    pub country_stroke: Color,
    pub country_stroke_width: f64,
    pub arc: Color,
    pub arc_width: f64,
    pub arc_dash: [f64; 2],
    pub origin_fill: Color,
    pub origin_stroke: Color,
    pub origin_radius: f64,
    pub hub_color: Color,
    pub hub_fill_opacity: f64,
    pub hub_radius: f64,
    pub origin_stroke_width: f64,
    pub hub_stroke_width: f64,
    pub label_font_size_px: f64,
    pub loading_text: Color,
}

impl Default for GlobeStyle {
    fn default() -> Self {
        Self {
            background: Color::hex(0x09090b),
            ocean_fill: Color::hex(0x050507),
            ocean_stroke: Color::hex(0x1a1a24),
            ocean_stroke_width: 2.0,
            atmosphere: Color::hex(0x3b82f6).with_alpha(0.1),
            atmosphere_width_px: 10.0,
            graticule: Color::hex(0x13131a),
            graticule_width: 0.5,
            country_fill: Color::hex(0x0f0f14),
            country_stroke: Color::hex(0x22222b),
            country_stroke_width: 0.5,
            arc: Color::hex(0x3b82f6).with_alpha(0.7),
            arc_width: 1.5,
            arc_dash: [5.0, 5.0],
            origin_fill: Color::hex(0xeab308),
            origin_stroke: Color::hex(0x000000),
            origin_radius: 8.0,
            hub_color: Color::hex(0xef4444),
            hub_fill_opacity: 0.3,
            hub_radius: 10.0,
            origin_stroke_width: 2.0,
            hub_stroke_width: 1.5,
            label_font_size_px: 11.0,
            loading_text: Color::hex(0x52525b),
        }
    }
}

impl GlobeStyle {
    pub fn validate(&self) -> AtlasResult<()> {
        for color in [
            self.background,
            self.ocean_fill,
            self.ocean_stroke,
            self.atmosphere,
            self.graticule,
            self.country_fill,
            self.country_stroke,
            self.arc,
            self.origin_fill,
            self.origin_stroke,
            self.hub_color,
            self.loading_text,
        ] {
            color.validate()?;
        }
        for (value, name) in [
            (self.ocean_stroke_width, "ocean_stroke_width"),
            (self.atmosphere_width_px, "atmosphere_width_px"),
            (self.graticule_width, "graticule_width"),
            (self.country_stroke_width, "country_stroke_width"),
            (self.arc_width, "arc_width"),
            (self.arc_dash[0], "arc_dash[0]"),
            (self.origin_radius, "origin_radius"),
            (self.hub_radius, "hub_radius"),
            (self.origin_stroke_width, "origin_stroke_width"),
            (self.hub_stroke_width, "hub_stroke_width"),
            (self.label_font_size_px, "label_font_size_px"),
        ] {
            ensure_positive(value, name)?;
        }
        if !self.arc_dash[1].is_finite() || self.arc_dash[1] < 0.0 {
            return Err(AtlasError::InvalidData(
                "globe `arc_dash[1]` must be finite and >= 0".to_owned(),
            ));
        }
        if !(0.0..=1.0).contains(&self.hub_fill_opacity) {
            return Err(AtlasError::InvalidData(
                "globe `hub_fill_opacity` must be in [0, 1]".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Globe bootstrap configuration.
///
/// Every field has a serde default so hosts can persist partial overrides.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlobeConfig {
    #[serde(default = "default_viewport")]
    pub viewport: Viewport,
    #[serde(default = "default_scale")]
    pub scale: f64,
    /// `[lambda, phi]` in degrees.
    #[serde(default = "default_initial_rotation")]
    pub initial_rotation: [f64; 2],
    /// Degrees of rotation per `scale` pixels dragged.
    #[serde(default = "default_drag_sensitivity")]
    pub drag_sensitivity: f64,
    #[serde(default = "default_idle_spin_deg_per_sec")]
    pub idle_spin_deg_per_sec: f64,
    #[serde(default = "default_visibility_threshold_rad")]
    pub visibility_threshold_rad: f64,
    #[serde(default = "default_label_offset_px")]
    pub label_offset_px: f64,
    #[serde(default = "default_intro_duration_ms")]
    pub intro_duration_ms: f64,
    #[serde(default)]
    pub intro_easing: Easing,
    /// Added to the origin latitude so the origin sits a little below center.
    #[serde(default = "default_intro_lat_offset_deg")]
    pub intro_lat_offset_deg: f64,
    #[serde(default = "default_arc_sample_step_deg")]
    pub arc_sample_step_deg: f64,
    #[serde(default)]
    pub kinetic: KineticRotationConfig,
    #[serde(default)]
    pub graticule: GraticuleSpec,
    #[serde(default)]
    pub style: GlobeStyle,
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            viewport: default_viewport(),
            scale: default_scale(),
            initial_rotation: default_initial_rotation(),
            drag_sensitivity: default_drag_sensitivity(),
            idle_spin_deg_per_sec: default_idle_spin_deg_per_sec(),
            visibility_threshold_rad: default_visibility_threshold_rad(),
            label_offset_px: default_label_offset_px(),
            intro_duration_ms: default_intro_duration_ms(),
            intro_easing: Easing::CubicOut,
            intro_lat_offset_deg: default_intro_lat_offset_deg(),
            arc_sample_step_deg: default_arc_sample_step_deg(),
            kinetic: KineticRotationConfig::default(),
            graticule: GraticuleSpec::default(),
            style: GlobeStyle::default(),
        }
    }
}

impl GlobeConfig {
    #[must_use]
    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    #[must_use]
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    #[must_use]
    pub fn with_kinetic(mut self, kinetic: KineticRotationConfig) -> Self {
        self.kinetic = kinetic;
        self
    }

    pub fn validate(&self) -> AtlasResult<()> {
        self.viewport.validate()?;
        for (value, name) in [
            (self.scale, "scale"),
            (self.drag_sensitivity, "drag_sensitivity"),
            (self.visibility_threshold_rad, "visibility_threshold_rad"),
            (self.arc_sample_step_deg, "arc_sample_step_deg"),
        ] {
            ensure_positive(value, name)?;
        }
        for (value, name) in [
            (self.idle_spin_deg_per_sec, "idle_spin_deg_per_sec"),
            (self.label_offset_px, "label_offset_px"),
            (self.intro_duration_ms, "intro_duration_ms"),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(AtlasError::InvalidData(format!(
                    "globe `{name}` must be finite and >= 0"
                )));
            }
        }
        if !self.intro_lat_offset_deg.is_finite()
            || !self.initial_rotation[0].is_finite()
            || !self.initial_rotation[1].is_finite()
        {
            return Err(AtlasError::InvalidData(
                "globe rotation settings must be finite".to_owned(),
            ));
        }
        let kinetic = self.kinetic;
        if !kinetic.decay_per_second.is_finite()
            || kinetic.decay_per_second <= 0.0
            || kinetic.decay_per_second >= 1.0
        {
            return Err(AtlasError::InvalidData(
                "kinetic decay per second must be in (0, 1)".to_owned(),
            ));
        }
        ensure_positive(kinetic.stop_velocity_deg_per_sec, "stop_velocity_deg_per_sec")?;
        self.graticule.validate()?;
        self.style.validate()
    }
}

fn ensure_positive(value: f64, name: &str) -> AtlasResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(AtlasError::InvalidData(format!(
            "globe `{name}` must be finite and > 0"
        )));
    }
    Ok(())
}

fn default_viewport() -> Viewport {
    Viewport::new(800, 650)
}

fn default_scale() -> f64 {
    280.0
}

fn default_initial_rotation() -> [f64; 2] {
    [0.0, -15.0]
}

fn default_drag_sensitivity() -> f64 {
    75.0
}

fn default_idle_spin_deg_per_sec() -> f64 {
    // 0.15° per frame at 60 Hz.
    9.0
}

fn default_visibility_threshold_rad() -> f64 {
    MARKER_VISIBILITY_THRESHOLD_RAD
}

fn default_label_offset_px() -> f64 {
    15.0
}

fn default_intro_duration_ms() -> f64 {
    2500.0
}

fn default_intro_lat_offset_deg() -> f64 {
    10.0
}

fn default_arc_sample_step_deg() -> f64 {
    2.0
}
