use serde::{Deserialize, Serialize};

/// Draw layers, back to front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SceneLayerKind {
    Background,
    Grid,
    Geography,
    Routes,
    Data,
    Markers,
    Labels,
    Overlay,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneLayerStack {
    pub layers: Vec<SceneLayerKind>,
}

impl SceneLayerStack {
    #[must_use]
    pub fn canonical() -> Self {
        Self {
            layers: vec![
                SceneLayerKind::Background,
                SceneLayerKind::Grid,
                SceneLayerKind::Geography,
                SceneLayerKind::Routes,
                SceneLayerKind::Data,
                SceneLayerKind::Markers,
                SceneLayerKind::Labels,
                SceneLayerKind::Overlay,
            ],
        }
    }
}
