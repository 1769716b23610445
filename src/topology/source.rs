use std::time::Duration;

use tracing::debug;

use crate::error::{AtlasError, AtlasResult};
use crate::topology::{CountryShape, Topology, feature};

pub const DEFAULT_BOUNDARY_URL: &str =
    "https://cdn.jsdelivr.net/npm/world-atlas@2/countries-110m.json";
pub const DEFAULT_BOUNDARY_OBJECT: &str = "countries";

/// Provider of country outlines for the globe.
pub trait BoundarySource {
    fn load(&self) -> AtlasResult<Vec<CountryShape>>;
}

/// Fetches a TopoJSON world atlas over HTTP.
#[derive(Debug, Clone)]
pub struct HttpBoundarySource {
    url: String,
    object: String,
    timeout: Duration,
}

impl HttpBoundarySource {
    #[must_use]
    pub fn new(url: impl Into<String>, object: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            object: object.into(),
            timeout: Duration::from_secs(20),
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Default for HttpBoundarySource {
    fn default() -> Self {
        Self::new(DEFAULT_BOUNDARY_URL, DEFAULT_BOUNDARY_OBJECT)
    }
}

impl BoundarySource for HttpBoundarySource {
    fn load(&self) -> AtlasResult<Vec<CountryShape>> {
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| AtlasError::BoundaryDatasetLoad(format!("http client error: {e}")))?;
        let raw = client
            .get(&self.url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| AtlasError::BoundaryDatasetLoad(format!("request error: {e}")))?
            .text()
            .map_err(|e| AtlasError::BoundaryDatasetLoad(format!("body read error: {e}")))?;

        let topology = Topology::from_json_str(&raw)?;
        let shapes = feature(&topology, &self.object)?;
        debug!(url = %self.url, countries = shapes.len(), "boundary dataset fetched");
        Ok(shapes)
    }
}

/// In-memory boundary source, for tests and bundled datasets.
#[derive(Debug, Clone, Default)]
pub struct StaticBoundarySource {
    shapes: Vec<CountryShape>,
}

impl StaticBoundarySource {
    #[must_use]
    pub fn new(shapes: Vec<CountryShape>) -> Self {
        Self { shapes }
    }

    /// Decodes `object` out of a TopoJSON document up front.
    pub fn from_topojson(raw: &str, object: &str) -> AtlasResult<Self> {
        let topology = Topology::from_json_str(raw)?;
        Ok(Self::new(feature(&topology, object)?))
    }
}

impl BoundarySource for StaticBoundarySource {
    fn load(&self) -> AtlasResult<Vec<CountryShape>> {
        Ok(self.shapes.clone())
    }
}
