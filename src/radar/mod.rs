//! Flavor radar and consumption-share donut.

mod chart;
mod share;

pub use chart::{RadarChart, RadarConfig, RadarValues, RadarVertices, axis_angle};
pub use share::{
    SHARE_PALETTE, ShareChart, ShareChartConfig, ShareSegment, ranked_hubs, share_segments,
};
