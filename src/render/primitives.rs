use serde::{Deserialize, Serialize};

use crate::core::ScreenPoint;
use crate::error::{AtlasError, AtlasResult};

/// RGBA color in normalized 0..=1 channel values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    #[must_use]
    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    /// Builds an opaque color from a `0xRRGGBB` literal.
    #[must_use]
    pub const fn hex(rgb: u32) -> Self {
        Self::rgb(
            ((rgb >> 16) & 0xff) as f64 / 255.0,
            ((rgb >> 8) & 0xff) as f64 / 255.0,
            (rgb & 0xff) as f64 / 255.0,
        )
    }

    #[must_use]
    pub fn with_alpha(self, alpha: f64) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
            ..self
        }
    }

    pub fn validate(self) -> AtlasResult<()> {
        for (channel, value) in [
            ("red", self.red),
            ("green", self.green),
            ("blue", self.blue),
            ("alpha", self.alpha),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(AtlasError::InvalidData(format!(
                    "color channel `{channel}` must be finite and in [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

/// Stroke settings shared by lines, polylines and circles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub width: f64,
    pub color: Color,
    /// `[on, off]` dash lengths in pixels; `None` draws solid.
    pub dash: Option<[f64; 2]>,
}

impl Stroke {
    #[must_use]
    pub const fn solid(width: f64, color: Color) -> Self {
        Self {
            width,
            color,
            dash: None,
        }
    }

    #[must_use]
    pub const fn dashed(width: f64, color: Color, on: f64, off: f64) -> Self {
        Self {
            width,
            color,
            dash: Some([on, off]),
        }
    }

    pub fn validate(self) -> AtlasResult<()> {
        if !self.width.is_finite() || self.width <= 0.0 {
            return Err(AtlasError::InvalidData(
                "stroke width must be finite and > 0".to_owned(),
            ));
        }
        if let Some([on, off]) = self.dash {
            if !on.is_finite() || !off.is_finite() || on <= 0.0 || off < 0.0 {
                return Err(AtlasError::InvalidData(
                    "stroke dash must be finite with on > 0 and off >= 0".to_owned(),
                ));
            }
        }
        self.color.validate()
    }
}

/// Draw command for one line segment in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinePrimitive {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub stroke: Stroke,
}

impl LinePrimitive {
    #[must_use]
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64, stroke: Stroke) -> Self {
        Self {
            x1,
            y1,
            x2,
            y2,
            stroke,
        }
    }

    pub fn validate(self) -> AtlasResult<()> {
        if !self.x1.is_finite()
            || !self.y1.is_finite()
            || !self.x2.is_finite()
            || !self.y2.is_finite()
        {
            return Err(AtlasError::InvalidData(
                "line coordinates must be finite".to_owned(),
            ));
        }
        self.stroke.validate()
    }
}

/// Open or closed path through screen points, optionally filled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolylinePrimitive {
    pub points: Vec<ScreenPoint>,
    pub closed: bool,
    pub stroke: Option<Stroke>,
    pub fill: Option<Color>,
}

impl PolylinePrimitive {
    #[must_use]
    pub fn open(points: Vec<ScreenPoint>, stroke: Stroke) -> Self {
        Self {
            points,
            closed: false,
            stroke: Some(stroke),
            fill: None,
        }
    }

    #[must_use]
    pub fn polygon(points: Vec<ScreenPoint>, fill: Color, stroke: Option<Stroke>) -> Self {
        Self {
            points,
            closed: true,
            stroke,
            fill: Some(fill),
        }
    }

    pub fn validate(&self) -> AtlasResult<()> {
        if self.points.len() < 2 {
            return Err(AtlasError::InvalidData(
                "polyline needs at least two points".to_owned(),
            ));
        }
        if self
            .points
            .iter()
            .any(|point| !point.x.is_finite() || !point.y.is_finite())
        {
            return Err(AtlasError::InvalidData(
                "polyline coordinates must be finite".to_owned(),
            ));
        }
        if self.stroke.is_none() && self.fill.is_none() {
            return Err(AtlasError::InvalidData(
                "polyline must have a stroke or a fill".to_owned(),
            ));
        }
        if let Some(stroke) = self.stroke {
            stroke.validate()?;
        }
        if let Some(fill) = self.fill {
            fill.validate()?;
        }
        Ok(())
    }
}

/// Circle in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CirclePrimitive {
    pub cx: f64,
    pub cy: f64,
    pub radius: f64,
    pub fill: Option<Color>,
    pub stroke: Option<Stroke>,
}

impl CirclePrimitive {
    #[must_use]
    pub const fn new(cx: f64, cy: f64, radius: f64) -> Self {
        Self {
            cx,
            cy,
            radius,
            fill: None,
            stroke: None,
        }
    }

    #[must_use]
    pub fn with_fill(mut self, fill: Color) -> Self {
        self.fill = Some(fill);
        self
    }

    #[must_use]
    pub fn with_stroke(mut self, stroke: Stroke) -> Self {
        self.stroke = Some(stroke);
        self
    }

    pub fn validate(self) -> AtlasResult<()> {
        if !self.cx.is_finite() || !self.cy.is_finite() {
            return Err(AtlasError::InvalidData(
                "circle center must be finite".to_owned(),
            ));
        }
        if !self.radius.is_finite() || self.radius < 0.0 {
            return Err(AtlasError::InvalidData(
                "circle radius must be finite and >= 0".to_owned(),
            ));
        }
        if let Some(fill) = self.fill {
            fill.validate()?;
        }
        if let Some(stroke) = self.stroke {
            stroke.validate()?;
        }
        Ok(())
    }
}

/// Filled rectangle in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectPrimitive {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill: Color,
}

impl RectPrimitive {
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64, fill: Color) -> Self {
        Self {
            x,
            y,
            width,
            height,
            fill,
        }
    }

    pub fn validate(self) -> AtlasResult<()> {
        if !self.x.is_finite() || !self.y.is_finite() {
            return Err(AtlasError::InvalidData(
                "rect origin must be finite".to_owned(),
            ));
        }
        if !self.width.is_finite()
            || !self.height.is_finite()
            || self.width < 0.0
            || self.height < 0.0
        {
            return Err(AtlasError::InvalidData(
                "rect size must be finite and >= 0".to_owned(),
            ));
        }
        self.fill.validate()
    }
}

/// Horizontal text alignment relative to `TextPrimitive::x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextHAlign {
    Left,
    Center,
    Right,
}

/// Draw command for one label in pixel space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextPrimitive {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub font_size_px: f64,
    pub bold: bool,
    pub color: Color,
    pub h_align: TextHAlign,
}

impl TextPrimitive {
    #[must_use]
    pub fn new(
        text: impl Into<String>,
        x: f64,
        y: f64,
        font_size_px: f64,
        color: Color,
        h_align: TextHAlign,
    ) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            font_size_px,
            bold: false,
            color,
            h_align,
        }
    }

    #[must_use]
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn validate(&self) -> AtlasResult<()> {
        if self.text.is_empty() {
            return Err(AtlasError::InvalidData(
                "text primitive must not be empty".to_owned(),
            ));
        }
        if !self.x.is_finite() || !self.y.is_finite() {
            return Err(AtlasError::InvalidData(
                "text coordinates must be finite".to_owned(),
            ));
        }
        if !self.font_size_px.is_finite() || self.font_size_px <= 0.0 {
            return Err(AtlasError::InvalidData(
                "font size must be finite and > 0".to_owned(),
            ));
        }
        self.color.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::{Color, PolylinePrimitive, Stroke};
    use crate::core::ScreenPoint;

    #[test]
    fn hex_color_decodes_channels() {
        let color = Color::hex(0x3b82f6);
        assert!((color.red - 59.0 / 255.0).abs() < 1e-12);
        assert!((color.green - 130.0 / 255.0).abs() < 1e-12);
        assert!((color.blue - 246.0 / 255.0).abs() < 1e-12);
        assert_eq!(color.alpha, 1.0);
    }

    #[test]
    fn polyline_requires_paint_and_points() {
        let stroke = Stroke::solid(1.0, Color::rgb(0.0, 0.0, 0.0));
        let single = PolylinePrimitive::open(vec![ScreenPoint::new(0.0, 0.0)], stroke);
        assert!(single.validate().is_err());

        let unpainted = PolylinePrimitive {
            points: vec![ScreenPoint::new(0.0, 0.0), ScreenPoint::new(1.0, 1.0)],
            closed: false,
            stroke: None,
            fill: None,
        };
        assert!(unpainted.validate().is_err());
    }

    #[test]
    fn dash_must_be_positive() {
        let stroke = Stroke::dashed(1.0, Color::rgb(0.0, 0.0, 0.0), 0.0, 5.0);
        assert!(stroke.validate().is_err());
    }
}
