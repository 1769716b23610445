use serde::{Deserialize, Serialize};

use crate::core::Viewport;
use crate::error::{AtlasError, AtlasResult};
use crate::render::{
    CirclePrimitive, LinePrimitive, PolylinePrimitive, RectPrimitive, TextPrimitive,
};

/// Backend-agnostic scene for one draw pass.
///
/// Backends draw primitive groups in field order: rects, polylines, lines,
/// circles, texts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderFrame {
    pub viewport: Viewport,
    pub rects: Vec<RectPrimitive>,
    pub polylines: Vec<PolylinePrimitive>,
    pub lines: Vec<LinePrimitive>,
    pub circles: Vec<CirclePrimitive>,
    pub texts: Vec<TextPrimitive>,
}

impl RenderFrame {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            rects: Vec::new(),
            polylines: Vec::new(),
            lines: Vec::new(),
            circles: Vec::new(),
            texts: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_line(mut self, line: LinePrimitive) -> Self {
        self.lines.push(line);
        self
    }

    #[must_use]
    pub fn with_polyline(mut self, polyline: PolylinePrimitive) -> Self {
        self.polylines.push(polyline);
        self
    }

    #[must_use]
    pub fn with_circle(mut self, circle: CirclePrimitive) -> Self {
        self.circles.push(circle);
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: TextPrimitive) -> Self {
        self.texts.push(text);
        self
    }

    #[must_use]
    pub fn with_rect(mut self, rect: RectPrimitive) -> Self {
        self.rects.push(rect);
        self
    }

    pub fn validate(&self) -> AtlasResult<()> {
        if !self.viewport.is_valid() {
            return Err(AtlasError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }

        for rect in &self.rects {
            rect.validate()?;
        }
        for polyline in &self.polylines {
            polyline.validate()?;
        }
        for line in &self.lines {
            line.validate()?;
        }
        for circle in &self.circles {
            circle.validate()?;
        }
        for text in &self.texts {
            text.validate()?;
        }

        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
            && self.polylines.is_empty()
            && self.lines.is_empty()
            && self.circles.is_empty()
            && self.texts.is_empty()
    }

    #[must_use]
    pub fn primitive_count(&self) -> usize {
        self.rects.len()
            + self.polylines.len()
            + self.lines.len()
            + self.circles.len()
            + self.texts.len()
    }

    /// Appends every primitive of `other`, keeping per-group order.
    pub fn extend(&mut self, other: &RenderFrame) {
        self.rects.extend(other.rects.iter().copied());
        self.polylines.extend(other.polylines.iter().cloned());
        self.lines.extend(other.lines.iter().copied());
        self.circles.extend(other.circles.iter().copied());
        self.texts.extend(other.texts.iter().cloned());
    }

    /// Serializes the frame for snapshot tooling.
    pub fn to_json_pretty(&self) -> AtlasResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| AtlasError::InvalidData(format!("failed to serialize render frame: {e}")))
    }
}
