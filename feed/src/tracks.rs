use anyhow::Result;
use geom::LonLat;
use serde::{Deserialize, Serialize};

use crate::FlightID;

/// One 3D position sample along a trajectory
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub longitude: f64,
    pub latitude: f64,
    /// Meters. Zero when the source only had 2D coordinates.
    pub altitude: f64,
}

impl Waypoint {
    pub fn new(longitude: f64, latitude: f64, altitude: f64) -> Self {
        Self {
            longitude,
            latitude,
            altitude,
        }
    }

    fn from_coords(coords: &[f64]) -> Result<Self> {
        match coords {
            [lon, lat] => Ok(Self::new(*lon, *lat, 0.0)),
            [lon, lat, alt, ..] => Ok(Self::new(*lon, *lat, *alt)),
            _ => bail!("Waypoint needs at least 2 coordinates, got {:?}", coords),
        }
    }

    pub fn pos(&self) -> LonLat {
        LonLat::new(self.longitude, self.latitude)
    }
}

/// One feature of the trajectory source
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlightTrack {
    pub flight_id: Option<FlightID>,
    // Each path is ordered. Usually there's just one.
    pub paths: Vec<Vec<Waypoint>>,
}

impl FlightTrack {
    pub fn first_path(&self) -> &[Waypoint] {
        self.paths.first().map(|p| p.as_slice()).unwrap_or(&[])
    }
}

pub fn load(bytes: &[u8]) -> Result<Vec<FlightTrack>> {
    let value: serde_json::Value = serde_json::from_slice(bytes)?;
    if value.get("type").and_then(|x| x.as_str()) == Some("FeatureCollection") {
        return load_geojson(value);
    }
    if value.get("features").is_some() {
        return load_esri(value);
    }
    bail!("Trajectory input is neither a GeoJSON FeatureCollection nor an Esri feature set")
}

fn load_geojson(value: serde_json::Value) -> Result<Vec<FlightTrack>> {
    use geojson::GeoJson;

    let collection = match GeoJson::from_json_value(value)? {
        GeoJson::FeatureCollection(fc) => fc,
        _ => bail!("Expected a FeatureCollection"),
    };

    let mut tracks = Vec::new();
    for feature in collection.features {
        let flight_id = feature.property(FLIGHT_ID).and_then(FlightID::from_json);
        let lines = match feature.geometry.map(|g| g.value) {
            Some(geojson::Value::LineString(line)) => vec![line],
            Some(geojson::Value::MultiLineString(lines)) => lines,
            Some(_) => {
                warn!("Skipping {:?} feature that isn't a line", flight_id);
                continue;
            }
            None => {
                warn!("Skipping {:?} feature without geometry", flight_id);
                continue;
            }
        };
        tracks.push(FlightTrack {
            flight_id,
            paths: to_paths(lines)?,
        });
    }
    Ok(tracks)
}

fn load_esri(value: serde_json::Value) -> Result<Vec<FlightTrack>> {
    let set: EsriFeatureSet = serde_json::from_value(value)?;
    let mut tracks = Vec::new();
    for feature in set.features {
        let flight_id = feature.attributes.get(FLIGHT_ID).and_then(FlightID::from_json);
        let paths = match feature.geometry {
            Some(geometry) => geometry.paths,
            None => {
                warn!("Skipping {:?} feature without geometry", flight_id);
                continue;
            }
        };
        tracks.push(FlightTrack {
            flight_id,
            paths: to_paths(paths)?,
        });
    }
    Ok(tracks)
}

fn to_paths(raw: Vec<Vec<Vec<f64>>>) -> Result<Vec<Vec<Waypoint>>> {
    let mut paths = Vec::new();
    for line in raw {
        let mut path = Vec::new();
        for coords in line {
            path.push(Waypoint::from_coords(&coords)?);
        }
        paths.push(path);
    }
    Ok(paths)
}

const FLIGHT_ID: &str = "FlightID";

#[derive(Deserialize)]
struct EsriFeatureSet {
    features: Vec<EsriFeature>,
}

#[derive(Deserialize)]
struct EsriFeature {
    #[serde(default)]
    attributes: serde_json::Map<String, serde_json::Value>,
    geometry: Option<EsriGeometry>,
}

#[derive(Deserialize)]
struct EsriGeometry {
    #[serde(default)]
    paths: Vec<Vec<Vec<f64>>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const GEOJSON: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {"FlightID": "CA931"},
                "geometry": {
                    "type": "LineString",
                    "coordinates": [[8.57, 50.03, 120.0], [8.6, 50.05, 900.5], [8.7, 50.1]]
                }
            },
            {
                "type": "Feature",
                "properties": {"FlightID": 442},
                "geometry": {
                    "type": "MultiLineString",
                    "coordinates": [[[1.0, 2.0], [3.0, 4.0]], [[5.0, 6.0, 7.0]]]
                }
            }
        ]
    }"#;

    const ESRI: &str = r#"{
        "geometryType": "esriGeometryPolyline",
        "features": [
            {
                "attributes": {"FlightID": "CA931", "OBJECTID": 1},
                "geometry": {"paths": [[[8.57, 50.03, 120.0], [8.6, 50.05, 900.5], [8.7, 50.1]]]}
            }
        ]
    }"#;

    #[test]
    fn geojson_tracks() -> Result<()> {
        let tracks = load(GEOJSON.as_bytes())?;
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].flight_id, Some(FlightID::new("CA931")));
        assert_eq!(
            tracks[0].first_path(),
            &[
                Waypoint::new(8.57, 50.03, 120.0),
                Waypoint::new(8.6, 50.05, 900.5),
                Waypoint::new(8.7, 50.1, 0.0),
            ]
        );
        assert_eq!(tracks[1].flight_id, Some(FlightID::new("442")));
        assert_eq!(tracks[1].paths.len(), 2);
        Ok(())
    }

    #[test]
    fn esri_matches_geojson() -> Result<()> {
        let esri = load(ESRI.as_bytes())?;
        let geojson = load(GEOJSON.as_bytes())?;
        assert_eq!(esri[0], geojson[0]);
        Ok(())
    }

    #[test]
    fn bad_inputs() {
        assert!(load(b"not json").is_err());
        assert!(load(br#"{"type": "Point", "coordinates": [1.0, 2.0]}"#).is_err());
        // A waypoint with a single coordinate
        assert!(load(br#"{"features": [{"geometry": {"paths": [[[1.0]]]}}]}"#).is_err());
    }

    #[test]
    fn missing_geometry_is_skipped() -> Result<()> {
        let tracks = load(br#"{"features": [{"attributes": {"FlightID": "X"}}]}"#)?;
        assert!(tracks.is_empty());
        Ok(())
    }
}
