use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::block::BlockCategory;

/// A single GPS fix. Serialized as `[longitude, latitude]`, the GeoJSON order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub longitude: f64,
    pub latitude: f64,
}

impl Coordinate {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }
}

impl From<[f64; 2]> for Coordinate {
    fn from([longitude, latitude]: [f64; 2]) -> Self {
        Self::new(longitude, latitude)
    }
}

impl Serialize for Coordinate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        [self.longitude, self.latitude].serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Coordinate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        <[f64; 2]>::deserialize(deserializer).map(Coordinate::from)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryKind {
    Polygon,
    LineString,
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Polygon => write!(f, "Polygon"),
            Self::LineString => write!(f, "LineString"),
        }
    }
}

/// Shaped geometry of a conquered block.
///
/// Kept free of any wire format; conversion to GeoJSON happens through
/// [`Feature`] at the storage and api boundaries.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// A single outer ring without holes. First and last point are equal.
    Polygon { ring: Vec<Coordinate> },
    LineString { points: Vec<Coordinate> },
}

impl Geometry {
    pub fn kind(&self) -> GeometryKind {
        match self {
            Self::Polygon { .. } => GeometryKind::Polygon,
            Self::LineString { .. } => GeometryKind::LineString,
        }
    }

    pub fn category(&self) -> BlockCategory {
        match self.kind() {
            GeometryKind::Polygon => BlockCategory::ClosedArea,
            GeometryKind::LineString => BlockCategory::OpenPatrol,
        }
    }

    pub fn points(&self) -> &[Coordinate] {
        match self {
            Self::Polygon { ring } => ring,
            Self::LineString { points } => points,
        }
    }

    pub fn to_feature(&self) -> Feature {
        let geometry = match self {
            Self::Polygon { ring } => FeatureGeometry::Polygon(vec![ring.clone()]),
            Self::LineString { points } => FeatureGeometry::LineString(points.clone()),
        };
        Feature {
            kind: FeatureType::Feature,
            geometry,
            properties: FeatureProperties {
                category: self.category(),
            },
        }
    }

    /// Reads back a stored feature. Rings beyond the outer one are ignored,
    /// a polygon without any ring is rejected.
    pub fn from_feature(feature: Feature) -> Result<Self, InvalidFeature> {
        match feature.geometry {
            FeatureGeometry::Polygon(rings) => rings
                .into_iter()
                .next()
                .map(|ring| Self::Polygon { ring })
                .ok_or(InvalidFeature::MissingRing),
            FeatureGeometry::LineString(points) => Ok(Self::LineString { points }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidFeature {
    #[error("polygon feature has no outer ring")]
    MissingRing,
}

// - GeoJSON wire format -

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureType {
    Feature,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum FeatureGeometry {
    Polygon(Vec<Vec<Coordinate>>),
    LineString(Vec<Coordinate>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureProperties {
    pub category: BlockCategory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: FeatureType,
    pub geometry: FeatureGeometry,
    pub properties: FeatureProperties,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn square() -> Vec<Coordinate> {
        vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(1.0, 0.0),
            Coordinate::new(1.0, 1.0),
            Coordinate::new(0.0, 0.0),
        ]
    }

    #[test]
    fn polygon_feature_nests_ring() {
        let geometry = Geometry::Polygon { ring: square() };
        let value = serde_json::to_value(geometry.to_feature()).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "Feature",
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]
                },
                "properties": { "category": "closed area" }
            })
        );
    }

    #[test]
    fn line_string_feature_is_flat() {
        let geometry = Geometry::LineString {
            points: vec![Coordinate::new(2.0, 3.0), Coordinate::new(4.0, 5.0)],
        };
        let value = serde_json::to_value(geometry.to_feature()).unwrap();
        assert_eq!(
            value["geometry"],
            json!({ "type": "LineString", "coordinates": [[2.0, 3.0], [4.0, 5.0]] })
        );
        assert_eq!(value["properties"]["category"], json!("open patrol"));
    }

    #[test]
    fn stored_feature_reads_back() {
        let geometry = Geometry::Polygon { ring: square() };
        let text = serde_json::to_string(&geometry.to_feature()).unwrap();
        let feature: Feature = serde_json::from_str(&text).unwrap();
        assert_eq!(Geometry::from_feature(feature).unwrap(), geometry);
    }

    #[test]
    fn polygon_without_ring_is_rejected() {
        let feature: Feature = serde_json::from_value(json!({
            "type": "Feature",
            "geometry": { "type": "Polygon", "coordinates": [] },
            "properties": { "category": "closed area" }
        }))
        .unwrap();
        assert_eq!(
            Geometry::from_feature(feature),
            Err(InvalidFeature::MissingRing)
        );
        assert_eq!(
            InvalidFeature::MissingRing.to_string(),
            "polygon feature has no outer ring"
        );
    }
}
