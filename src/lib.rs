//! culinary-atlas: renderer-agnostic engine for AI-narrated dish histories.
//!
//! A query goes through a [`narrative::NarrativeBackend`] and comes back as a
//! validated [`narrative::FoodReport`]. The report feeds an interactive
//! orthographic globe, a flavor radar, a consumption-share donut and text
//! sections. Every visual component materializes a deterministic
//! [`render::RenderFrame`] that any [`render::Renderer`] backend can draw.

pub mod config;
pub mod core;
pub mod error;
pub mod globe;
pub mod interaction;
pub mod narrative;
pub mod radar;
pub mod render;
pub mod shell;
pub mod telemetry;
pub mod topology;

pub use config::AtlasConfig;
pub use error::{AtlasError, AtlasResult};
pub use globe::{GlobeConfig, GlobeRenderer};
pub use shell::{PresentationShell, ReportView};
