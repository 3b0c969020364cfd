use feed::{FlightID, FlightTrack};

#[derive(Debug, PartialEq)]
pub enum FlightSearch {
    MissingInput,
    NoMatch(FlightID),
    /// Indices into the track list
    Matches(FlightID, Vec<usize>),
}

impl FlightSearch {
    pub fn describe(&self) -> String {
        match self {
            FlightSearch::MissingInput => "Please enter a flight number".to_string(),
            FlightSearch::NoMatch(id) => format!("No trajectory for flight {id}"),
            FlightSearch::Matches(id, tracks) => {
                format!("Flight {id}: {} trajectories", tracks.len())
            }
        }
    }
}

/// Exact match on the flight ID, after trimming the input
pub fn search(tracks: &[FlightTrack], input: &str) -> FlightSearch {
    let input = input.trim();
    if input.is_empty() {
        return FlightSearch::MissingInput;
    }
    let id = FlightID::new(input);
    let matches: Vec<usize> = tracks
        .iter()
        .enumerate()
        .filter(|(_, track)| track.flight_id.as_ref() == Some(&id))
        .map(|(idx, _)| idx)
        .collect();
    if matches.is_empty() {
        FlightSearch::NoMatch(id)
    } else {
        FlightSearch::Matches(id, matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feed::Waypoint;

    fn track(id: Option<&str>) -> FlightTrack {
        FlightTrack {
            flight_id: id.map(FlightID::new),
            paths: vec![vec![Waypoint::new(8.57, 50.03, 0.0)]],
        }
    }

    #[test]
    fn exact_match_only() {
        let tracks = vec![
            track(Some("CA931")),
            track(None),
            track(Some("CA9310")),
            track(Some("CA931")),
        ];
        assert_eq!(
            search(&tracks, " CA931 "),
            FlightSearch::Matches(FlightID::new("CA931"), vec![0, 3])
        );
        assert_eq!(
            search(&tracks, "CA93"),
            FlightSearch::NoMatch(FlightID::new("CA93"))
        );
        assert_eq!(
            search(&tracks, "ca931"),
            FlightSearch::NoMatch(FlightID::new("ca931"))
        );
    }

    #[test]
    fn missing_input() {
        assert_eq!(search(&[], "   "), FlightSearch::MissingInput);
        assert_eq!(search(&[], "").describe(), "Please enter a flight number");
    }
}
