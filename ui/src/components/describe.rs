use widgetry::{Line, Text};

use model::{FlightTrack, FlowQuery, Waypoint};

pub fn track(track: &FlightTrack) -> Text {
    let mut txt = Text::from(match track.flight_id {
        Some(ref id) => format!("Flight {id}"),
        None => "Unidentified flight".to_string(),
    });
    let points: usize = track.paths.iter().map(|p| p.len()).sum();
    txt.add_line(Line(format!("{points} waypoints")));
    txt
}

pub fn marker(waypoint: &Waypoint, cursor: usize, total: usize) -> Text {
    let mut txt = Text::from(format!("Waypoint {} of {total}", cursor + 1));
    txt.add_line(Line(format!(
        "{:.5}, {:.5}",
        waypoint.longitude, waypoint.latitude
    )));
    txt.add_line(Line(format!("Altitude: {:.0} m", waypoint.altitude)));
    txt
}

pub fn flow_query(query: &FlowQuery) -> Text {
    let mut txt = Text::from(query.describe());
    match query {
        FlowQuery::Found { timestamp, .. } | FlowQuery::NotFound(timestamp) => {
            txt.add_line(Line(format!("Queried {timestamp}")).secondary());
        }
        _ => {}
    }
    txt
}
