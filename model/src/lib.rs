#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

mod animator;
mod aux_docs;
pub mod defaults;
mod flights;
mod lookup;
mod timestamp;

use anyhow::Result;
use geom::{Bounds, GPSBounds, LonLat};

pub use feed::{FlightID, FlightTrack, FlowRecord, Waypoint};

pub use self::animator::Animator;
pub use self::aux_docs::AuxDocuments;
pub use self::flights::FlightSearch;
pub use self::lookup::{find_flow, FlowQuery, FlowSeries};
pub use self::timestamp::{normalize, CanonicalTimestamp, InvalidTimestamp};

/// Everything loaded for one session. Built empty at startup, then filled in as sources arrive.
pub struct Model {
    pub bounds: Bounds,
    pub gps_bounds: GPSBounds,
    pub tracks: Vec<FlightTrack>,
    pub flows: FlowSeries,
    pub aux_docs: AuxDocuments,
}

impl Model {
    pub fn empty(aux_docs: AuxDocuments) -> Self {
        let gps_bounds = bounds_around(&[]);
        Self {
            bounds: gps_bounds.to_bounds(),
            gps_bounds,
            tracks: Vec::new(),
            flows: FlowSeries::Pending,
            aux_docs,
        }
    }

    pub fn load_tracks(&mut self, bytes: &[u8]) -> Result<()> {
        let tracks = feed::load_tracks(bytes)?;
        self.set_tracks(tracks);
        Ok(())
    }

    pub fn set_tracks(&mut self, tracks: Vec<FlightTrack>) {
        self.gps_bounds = bounds_around(&tracks);
        self.bounds = self.gps_bounds.to_bounds();
        self.tracks = tracks;
    }

    /// A failed fetch leaves the series empty-but-known, so lookups report it instead of
    /// pretending there's no data for that time.
    pub fn set_flows(&mut self, result: Result<Vec<u8>>) {
        self.flows = match result {
            Ok(bytes) => FlowSeries::Loaded(feed::load_flows(bytes.as_slice())),
            Err(err) => {
                error!("Couldn't load flow data: {err}");
                FlowSeries::Failed(err.to_string())
            }
        };
    }

    /// The path the marker follows: the first path of the first feature
    pub fn animated_path(&self) -> &[Waypoint] {
        self.tracks
            .first()
            .map(|track| track.first_path())
            .unwrap_or(&[])
    }

    /// `None` until some trajectory has loaded. A loaded trajectory with an empty first path
    /// still gets an animator, which just never moves.
    pub fn animator(&self) -> Result<Option<Animator>> {
        if self.tracks.is_empty() {
            return Ok(None);
        }
        Animator::new(self.animated_path().to_vec(), defaults::animation_interval()).map(Some)
    }

    pub fn query_flow(&self, input: &str) -> FlowQuery {
        lookup::query(&self.flows, &self.aux_docs, input)
    }

    pub fn search_flight(&self, input: &str) -> FlightSearch {
        flights::search(&self.tracks, input)
    }
}

fn bounds_around(tracks: &[FlightTrack]) -> GPSBounds {
    let mut gps_bounds = GPSBounds::new();
    let mut any = false;
    for track in tracks {
        for path in &track.paths {
            for waypoint in path {
                gps_bounds.update(waypoint.pos());
                any = true;
            }
        }
    }
    if !any {
        // Nothing to frame yet; use the starting view
        let (lon, lat) = defaults::CENTER;
        gps_bounds.update(LonLat::new(lon - 0.1, lat - 0.1));
        gps_bounds.update(LonLat::new(lon + 0.1, lat + 0.1));
    }
    gps_bounds
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRACKS: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {"FlightID": "CA931"},
                "geometry": {"type": "LineString", "coordinates": [[8.5, 50.0, 300], [8.6, 50.1, 600], [8.7, 50.2, 900]]}
            },
            {
                "type": "Feature",
                "properties": {"FlightID": "LH400"},
                "geometry": {"type": "LineString", "coordinates": [[9.0, 51.0], [9.1, 51.1]]}
            }
        ]
    }"#;

    #[test]
    fn animates_first_path_of_first_feature() -> Result<()> {
        let mut model = Model::empty(AuxDocuments::default());
        assert!(model.animated_path().is_empty());
        // Nothing to animate before the trajectory arrives
        assert!(model.animator()?.is_none());
        model.load_tracks(TRACKS.as_bytes())?;
        assert_eq!(model.tracks.len(), 2);
        assert_eq!(model.animated_path().len(), 3);

        let mut animator = model.animator()?.unwrap();
        for _ in 0..4 {
            animator.tick();
        }
        assert_eq!(animator.cursor(), 1);
        Ok(())
    }

    #[test]
    fn empty_first_path_still_animates() -> Result<()> {
        let mut model = Model::empty(AuxDocuments::default());
        model.set_tracks(vec![FlightTrack {
            flight_id: None,
            paths: Vec::new(),
        }]);
        let mut animator = model.animator()?.unwrap();
        assert_eq!(animator.tick(), None);
        Ok(())
    }

    #[test]
    fn flow_lifecycle() {
        let mut model = Model::empty(AuxDocuments::default());
        assert_eq!(model.query_flow("2018-07-07T00:20"), FlowQuery::NotLoaded);

        model.set_flows(Err(anyhow!("connection refused")));
        assert_eq!(
            model.query_flow("2018-07-07T00:20"),
            FlowQuery::LoadFailed("connection refused".to_string())
        );

        model.set_flows(Ok(b"time,flow\n2018/7/7 0:20,42\n".to_vec()));
        let result = model.query_flow(defaults::QUERY_TIME);
        assert_eq!(result.describe(), "Flow at this time: 42");
        assert_eq!(result.document(), Some("data/data7_7.html"));
    }

    #[test]
    fn flight_search() -> Result<()> {
        let mut model = Model::empty(AuxDocuments::default());
        model.load_tracks(TRACKS.as_bytes())?;
        assert_eq!(
            model.search_flight("LH400"),
            FlightSearch::Matches(FlightID::new("LH400"), vec![1])
        );
        assert_eq!(model.search_flight(""), FlightSearch::MissingInput);
        Ok(())
    }
}
