pub mod easing;
pub mod geo;
pub mod graticule;
pub mod scale;
pub mod transition;
pub mod types;

pub use easing::Easing;
pub use geo::{
    GreatCircle, MARKER_VISIBILITY_THRESHOLD_RAD, OrthographicProjection, angular_distance,
    normalize_longitude,
};
pub use graticule::GraticuleSpec;
pub use scale::LinearScale;
pub use transition::Transition;
pub use types::{GeoPoint, ScreenPoint, Viewport};
