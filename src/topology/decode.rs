use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::GeoPoint;
use crate::error::{AtlasError, AtlasResult};

/// Quantization transform of a TopoJSON document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TopologyTransform {
    pub scale: [f64; 2],
    pub translate: [f64; 2],
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeometryProperties {
    #[serde(default)]
    pub name: Option<String>,
}

/// Geometry object as stored in `Topology::objects`.
///
/// Only the areal geometry kinds are decoded; anything else is kept as
/// `Unsupported` and skipped.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum TopoGeometry {
    GeometryCollection {
        geometries: Vec<TopoGeometry>,
    },
    Polygon {
        arcs: Vec<Vec<i64>>,
        #[serde(default)]
        id: Option<serde_json::Value>,
        #[serde(default)]
        properties: GeometryProperties,
    },
    MultiPolygon {
        arcs: Vec<Vec<Vec<i64>>>,
        #[serde(default)]
        id: Option<serde_json::Value>,
        #[serde(default)]
        properties: GeometryProperties,
    },
    #[serde(other)]
    Unsupported,
}

/// A TopoJSON document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Topology {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub transform: Option<TopologyTransform>,
    pub arcs: Vec<Vec<Vec<f64>>>,
    pub objects: IndexMap<String, TopoGeometry>,
}

/// One country outline decoded from the boundary dataset.
///
/// `rings` holds every exterior and interior ring of every polygon part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryShape {
    pub id: Option<String>,
    pub name: String,
    pub rings: Vec<Vec<GeoPoint>>,
}

impl CountryShape {
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.rings.iter().map(Vec::len).sum()
    }
}

impl Topology {
    pub fn from_json_str(raw: &str) -> AtlasResult<Self> {
        let topology: Self = serde_json::from_str(raw).map_err(|err| {
            AtlasError::BoundaryDatasetLoad(format!("invalid topology json: {err}"))
        })?;
        if topology.kind != "Topology" {
            return Err(AtlasError::BoundaryDatasetLoad(format!(
                "expected a `Topology` document, found `{}`",
                topology.kind
            )));
        }
        Ok(topology)
    }

    /// Decodes every arc into absolute longitude/latitude positions.
    ///
    /// Quantized documents store delta-encoded integer positions that the
    /// transform maps back to degrees.
    pub fn decode_arcs(&self) -> AtlasResult<Vec<Vec<[f64; 2]>>> {
        self.arcs
            .iter()
            .enumerate()
            .map(|(index, arc)| {
                let mut x = 0.0;
                let mut y = 0.0;
                arc.iter()
                    .map(|position| {
                        let [px, py] = match position.as_slice() {
                            [px, py, ..] => [*px, *py],
                            _ => {
                                return Err(AtlasError::BoundaryDatasetLoad(format!(
                                    "arc {index} has a position with fewer than two values"
                                )));
                            }
                        };
                        match self.transform {
                            Some(transform) => {
                                x += px;
                                y += py;
                                Ok([
                                    x * transform.scale[0] + transform.translate[0],
                                    y * transform.scale[1] + transform.translate[1],
                                ])
                            }
                            None => Ok([px, py]),
                        }
                    })
                    .collect()
            })
            .collect()
    }
}

/// Extracts the named object as country shapes.
///
/// Geometries without polygon parts are skipped; a missing object or a
/// dangling arc reference fails the whole decode.
pub fn feature(topology: &Topology, object: &str) -> AtlasResult<Vec<CountryShape>> {
    let root = topology.objects.get(object).ok_or_else(|| {
        AtlasError::BoundaryDatasetLoad(format!("topology has no object named `{object}`"))
    })?;
    let arcs = topology.decode_arcs()?;

    let mut shapes = Vec::new();
    collect_shapes(root, &arcs, &mut shapes)?;
    Ok(shapes)
}

fn collect_shapes(
    geometry: &TopoGeometry,
    arcs: &[Vec<[f64; 2]>],
    out: &mut Vec<CountryShape>,
) -> AtlasResult<()> {
    match geometry {
        TopoGeometry::GeometryCollection { geometries } => {
            for child in geometries {
                collect_shapes(child, arcs, out)?;
            }
        }
        TopoGeometry::Polygon {
            arcs: rings,
            id,
            properties,
        } => {
            let rings = rings
                .iter()
                .map(|ring| stitch_ring(ring, arcs))
                .collect::<AtlasResult<Vec<_>>>()?;
            out.push(shape(id.as_ref(), properties, rings));
        }
        TopoGeometry::MultiPolygon {
            arcs: polygons,
            id,
            properties,
        } => {
            let rings = polygons
                .iter()
                .flatten()
                .map(|ring| stitch_ring(ring, arcs))
                .collect::<AtlasResult<Vec<_>>>()?;
            out.push(shape(id.as_ref(), properties, rings));
        }
        TopoGeometry::Unsupported => {}
    }
    Ok(())
}

fn shape(
    id: Option<&serde_json::Value>,
    properties: &GeometryProperties,
    rings: Vec<Vec<GeoPoint>>,
) -> CountryShape {
    let id = id.map(|value| match value {
        serde_json::Value::String(text) => text.clone(),
        other => other.to_string(),
    });
    let name = properties
        .name
        .clone()
        .or_else(|| id.clone())
        .unwrap_or_default();
    CountryShape { id, name, rings }
}

/// Joins arc references into one ring. `~i` walks arc `i` backwards; the
/// shared point between consecutive arcs is kept once.
fn stitch_ring(references: &[i64], arcs: &[Vec<[f64; 2]>]) -> AtlasResult<Vec<GeoPoint>> {
    let mut ring: Vec<GeoPoint> = Vec::new();
    for &reference in references {
        let (index, reversed) = if reference < 0 {
            (!reference, true)
        } else {
            (reference, false)
        };
        let arc = usize::try_from(index)
            .ok()
            .and_then(|index| arcs.get(index))
            .ok_or_else(|| {
                AtlasError::BoundaryDatasetLoad(format!("arc reference {reference} out of range"))
            })?;

        if !ring.is_empty() {
            ring.pop();
        }
        let mut push = |position: &[f64; 2]| -> AtlasResult<()> {
            ring.push(to_geo_point(*position)?);
            Ok(())
        };
        if reversed {
            arc.iter().rev().try_for_each(&mut push)?;
        } else {
            arc.iter().try_for_each(&mut push)?;
        }
    }
    Ok(ring)
}

/// Dequantized positions can overshoot the valid range by rounding noise.
fn to_geo_point([lon, lat]: [f64; 2]) -> AtlasResult<GeoPoint> {
    if !lon.is_finite() || !lat.is_finite() {
        return Err(AtlasError::BoundaryDatasetLoad(
            "topology position is not finite".to_owned(),
        ));
    }
    Ok(GeoPoint::unchecked(
        lon.clamp(-180.0, 180.0),
        lat.clamp(-90.0, 90.0),
    ))
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::{Topology, feature};

    const QUANTIZED: &str = r#"{
        "type": "Topology",
        "transform": {"scale": [0.5, 0.25], "translate": [-10.0, 20.0]},
        "arcs": [
            [[0, 0], [4, 0], [0, 4]],
            [[4, 4], [-4, 0], [0, -4]]
        ],
        "objects": {
            "countries": {
                "type": "GeometryCollection",
                "geometries": [
                    {"type": "Polygon", "id": "001", "properties": {"name": "Square"}, "arcs": [[0, 1]]},
                    {"type": "Polygon", "id": 2, "arcs": [[-2, -1]]},
                    {"type": "Point", "coordinates": [1, 1]}
                ]
            }
        }
    }"#;

    #[test]
    fn delta_decoding_applies_transform() {
        let topology = Topology::from_json_str(QUANTIZED).expect("topology");
        let arcs = topology.decode_arcs().expect("arcs");
        assert_eq!(arcs[0], vec![[-10.0, 20.0], [-8.0, 20.0], [-8.0, 21.0]]);
        assert_eq!(arcs[1], vec![[-8.0, 21.0], [-10.0, 21.0], [-10.0, 20.0]]);
    }

    #[test]
    fn feature_stitches_arcs_and_skips_points() {
        let topology = Topology::from_json_str(QUANTIZED).expect("topology");
        let shapes = feature(&topology, "countries").expect("shapes");
        assert_eq!(shapes.len(), 2);

        let square = &shapes[0];
        assert_eq!(square.name, "Square");
        assert_eq!(square.id.as_deref(), Some("001"));
        assert_eq!(square.rings.len(), 1);
        // Five arc positions, the shared joint kept once.
        assert_eq!(square.point_count(), 5);
        assert_eq!(square.rings[0].first(), square.rings[0].last());

        // `-2` and `-1` are `~1` and `~0`: both arcs walked backwards.
        let reversed = &shapes[1];
        assert_eq!(reversed.name, "2");
        let first = reversed.rings[0][0];
        assert_abs_diff_eq!(first.lon, -10.0);
        assert_abs_diff_eq!(first.lat, 20.0);
        let second = reversed.rings[0][1];
        assert_abs_diff_eq!(second.lon, -10.0);
        assert_abs_diff_eq!(second.lat, 21.0);
    }

    #[test]
    fn missing_object_and_dangling_arc_fail() {
        let topology = Topology::from_json_str(QUANTIZED).expect("topology");
        assert!(feature(&topology, "land").is_err());

        let dangling = r#"{"type":"Topology","arcs":[],"objects":{"countries":
            {"type":"Polygon","arcs":[[3]]}}}"#;
        let topology = Topology::from_json_str(dangling).expect("topology");
        assert!(feature(&topology, "countries").is_err());
    }

    #[test]
    fn rejects_non_topology_documents() {
        let raw = r#"{"type":"FeatureCollection","arcs":[],"objects":{}}"#;
        assert!(Topology::from_json_str(raw).is_err());
    }
}
