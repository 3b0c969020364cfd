//! Where the original deployment got its data, and the initial state of the controls.

use geom::Duration;

pub const TRAJECTORY_URL: &str =
    "https://www.arcgis.com/sharing/rest/content/items/082ebada8c124f21b4b6f099e2c06126/data";
pub const FLOWS_URL: &str =
    "https://raw.githubusercontent.com/WHxxxxWH/plane/refs/heads/main/result.csv";

/// The date-time picker starts here
pub const QUERY_TIME: &str = "2018-07-07T00:20";
/// Minutes between date-time picker steps
pub const QUERY_STEP_MINUTES: u32 = 15;

/// The initial camera, before any trajectory loads: (longitude, latitude)
pub const CENTER: (f64, f64) = (8.57, 50.03);

pub fn animation_interval() -> Duration {
    Duration::seconds(1.0)
}
