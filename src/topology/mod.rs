//! Country boundary dataset: TopoJSON decoding and loading.

mod decode;
mod source;

pub use decode::{
    CountryShape, GeometryProperties, TopoGeometry, Topology, TopologyTransform, feature,
};
pub use source::{
    BoundarySource, DEFAULT_BOUNDARY_OBJECT, DEFAULT_BOUNDARY_URL, HttpBoundarySource,
    StaticBoundarySource,
};
