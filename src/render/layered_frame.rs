use crate::core::Viewport;

use super::{
    CirclePrimitive, LinePrimitive, PolylinePrimitive, RectPrimitive, RenderFrame,
    SceneLayerKind, SceneLayerStack, TextPrimitive,
};

#[derive(Debug, Clone, PartialEq)]
pub struct LayerPrimitives {
    pub kind: SceneLayerKind,
    pub frame: RenderFrame,
}

/// Scene split by draw layer so hosts can redraw layers selectively.
#[derive(Debug, Clone, PartialEq)]
pub struct LayeredRenderFrame {
    pub viewport: Viewport,
    pub layers: Vec<LayerPrimitives>,
}

impl LayeredRenderFrame {
    #[must_use]
    pub fn from_stack(viewport: Viewport, stack: SceneLayerStack) -> Self {
        let layers = stack
            .layers
            .into_iter()
            .map(|kind| LayerPrimitives {
                kind,
                frame: RenderFrame::new(viewport),
            })
            .collect();
        Self { viewport, layers }
    }

    #[must_use]
    pub fn canonical(viewport: Viewport) -> Self {
        Self::from_stack(viewport, SceneLayerStack::canonical())
    }

    pub fn push_line(&mut self, kind: SceneLayerKind, line: LinePrimitive) {
        if let Some(layer) = self.layer_mut(kind) {
            layer.frame.lines.push(line);
        }
    }

    pub fn push_polyline(&mut self, kind: SceneLayerKind, polyline: PolylinePrimitive) {
        if let Some(layer) = self.layer_mut(kind) {
            layer.frame.polylines.push(polyline);
        }
    }

    pub fn push_circle(&mut self, kind: SceneLayerKind, circle: CirclePrimitive) {
        if let Some(layer) = self.layer_mut(kind) {
            layer.frame.circles.push(circle);
        }
    }

    pub fn push_rect(&mut self, kind: SceneLayerKind, rect: RectPrimitive) {
        if let Some(layer) = self.layer_mut(kind) {
            layer.frame.rects.push(rect);
        }
    }

    pub fn push_text(&mut self, kind: SceneLayerKind, text: TextPrimitive) {
        if let Some(layer) = self.layer_mut(kind) {
            layer.frame.texts.push(text);
        }
    }

    #[must_use]
    pub fn layer(&self, kind: SceneLayerKind) -> Option<&RenderFrame> {
        self.layers
            .iter()
            .find(|layer| layer.kind == kind)
            .map(|layer| &layer.frame)
    }

    /// Merges all layers back to front into one frame.
    ///
    /// Within the merged frame, each primitive group keeps layer order.
    #[must_use]
    pub fn flatten(&self) -> RenderFrame {
        let mut frame = RenderFrame::new(self.viewport);
        for layer in &self.layers {
            frame.extend(&layer.frame);
        }
        frame
    }

    #[must_use]
    pub fn flatten_layers(&self, include_layers: &[SceneLayerKind]) -> RenderFrame {
        let mut frame = RenderFrame::new(self.viewport);
        for layer in &self.layers {
            if include_layers.contains(&layer.kind) {
                frame.extend(&layer.frame);
            }
        }
        frame
    }

    fn layer_mut(&mut self, kind: SceneLayerKind) -> Option<&mut LayerPrimitives> {
        self.layers.iter_mut().find(|layer| layer.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::LayeredRenderFrame;
    use crate::core::Viewport;
    use crate::render::{
        CirclePrimitive, Color, LinePrimitive, SceneLayerKind, Stroke, TextHAlign, TextPrimitive,
    };

    #[test]
    fn layered_render_frame_flattens_in_layer_order() {
        let mut layered = LayeredRenderFrame::canonical(Viewport::new(100, 50));
        let stroke = Stroke::solid(1.0, Color::rgb(0.2, 0.2, 0.2));

        layered.push_line(
            SceneLayerKind::Routes,
            LinePrimitive::new(0.0, 2.0, 5.0, 3.0, stroke),
        );
        layered.push_line(
            SceneLayerKind::Grid,
            LinePrimitive::new(0.0, 1.0, 5.0, 1.0, stroke),
        );
        layered.push_circle(SceneLayerKind::Markers, CirclePrimitive::new(3.0, 3.0, 2.0));
        layered.push_text(
            SceneLayerKind::Labels,
            TextPrimitive::new("x", 2.0, 4.0, 10.0, Color::rgb(1.0, 1.0, 1.0), TextHAlign::Right),
        );

        let flattened = layered.flatten();
        assert_eq!(flattened.lines.len(), 2);
        assert_eq!(flattened.circles.len(), 1);
        assert_eq!(flattened.texts.len(), 1);
        // Grid comes before Routes in the canonical stack.
        assert_eq!(flattened.lines[0].y1, 1.0);
        assert_eq!(flattened.lines[1].y1, 2.0);

        let grid_only = layered.flatten_layers(&[SceneLayerKind::Grid]);
        assert_eq!(grid_only.lines.len(), 1);
        assert!(grid_only.texts.is_empty());
    }
}
