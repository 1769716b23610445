//! Interactive orthographic globe: projection state, markers, migration arcs
//! and the rotation state machine.

mod config;
mod geography;
pub mod markers;
mod renderer;
mod scene;
mod scheduler;

pub use config::{GlobeConfig, GlobeStyle};
pub use geography::{GlobeGeography, HubPoint};
pub use markers::{MarkerKind, MarkerPlacement, ORIGIN_LABEL};
pub use renderer::{BoundaryStatus, GlobeRenderer, RotationDriver};
pub use scene::LOADING_LABEL;
pub use scheduler::{FrameScheduler, ManualScheduler, TimerId};
