#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

mod flow;
mod ids;
mod tracks;

pub use flow::FlowRecord;
pub use ids::FlightID;
pub use tracks::{FlightTrack, Waypoint};

use anyhow::Result;

/// Parses a flight trajectory feature collection. Both GeoJSON and the Esri JSON returned by
/// `queryFeatures` are understood.
pub fn load_tracks(bytes: &[u8]) -> Result<Vec<FlightTrack>> {
    let tracks = tracks::load(bytes)?;
    info!(
        "Loaded {} flight tracks with {} waypoints total",
        tracks.len(),
        tracks
            .iter()
            .flat_map(|t| t.paths.iter())
            .map(|p| p.len())
            .sum::<usize>()
    );
    Ok(tracks)
}

/// Parses the flow time-series. Malformed lines are skipped, never fatal.
pub fn load_flows<R: std::io::Read>(reader: R) -> Vec<FlowRecord> {
    let records = flow::load(reader);
    info!("Loaded {} flow records", records.len());
    records
}
