use anyhow::Result;
use geom::Duration;

use feed::Waypoint;

/// Steps a marker through a sequence of waypoints at a fixed interval, looping back to the start
/// forever. Nothing happens on its own; the caller feeds in elapsed time.
pub struct Animator {
    waypoints: Vec<Waypoint>,
    // Always < waypoints.len(), or 0 when there are no waypoints
    cursor: usize,
    interval: Duration,
    // Time since the last tick
    elapsed: Duration,
    running: bool,
    warned_empty: bool,
}

impl Animator {
    pub fn new(waypoints: Vec<Waypoint>, interval: Duration) -> Result<Self> {
        if interval <= Duration::ZERO {
            bail!("Animation interval must be positive, not {}", interval);
        }
        Ok(Self {
            waypoints,
            cursor: 0,
            interval,
            elapsed: Duration::ZERO,
            running: true,
            warned_empty: false,
        })
    }

    /// No more ticks until `resume`. The cursor stays where it is.
    pub fn stop(&mut self) {
        if self.running {
            debug!("Stopping the animation at point {}", self.cursor);
        }
        self.running = false;
        self.elapsed = Duration::ZERO;
    }

    pub fn resume(&mut self) {
        self.running = true;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    /// Returns the waypoint to move the marker to, then advances the cursor. `None` while stopped
    /// or when there's nothing to animate along.
    pub fn tick(&mut self) -> Option<Waypoint> {
        if !self.running {
            return None;
        }
        if self.waypoints.is_empty() {
            if !self.warned_empty {
                warn!("No waypoints to animate along; the marker won't move");
                self.warned_empty = true;
            }
            return None;
        }

        let waypoint = self.waypoints[self.cursor];
        self.cursor += 1;
        trace!("Moving to point {} of {}", self.cursor, self.waypoints.len());
        if self.cursor == self.waypoints.len() {
            debug!("Reached the end of the path");
            self.cursor = 0;
        }
        Some(waypoint)
    }

    /// Accounts for real time passing. Fires one tick per whole interval elapsed and returns the
    /// last position produced.
    pub fn advance(&mut self, dt: Duration) -> Option<Waypoint> {
        if !self.running {
            return None;
        }
        self.elapsed = self.elapsed + dt;
        let mut latest = None;
        while self.elapsed >= self.interval {
            self.elapsed = self.elapsed - self.interval;
            if let Some(waypoint) = self.tick() {
                latest = Some(waypoint);
            }
        }
        latest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(n: usize) -> Vec<Waypoint> {
        (0..n)
            .map(|i| Waypoint::new(i as f64, 50.0, 100.0 * i as f64))
            .collect()
    }

    fn animator(n: usize) -> Animator {
        Animator::new(path(n), Duration::seconds(1.0)).unwrap()
    }

    #[test]
    fn wraps_after_the_last_point() {
        let mut a = animator(3);
        let visited: Vec<f64> = (0..4).map(|_| a.tick().unwrap().longitude).collect();
        assert_eq!(visited, vec![0.0, 1.0, 2.0, 0.0]);
        assert_eq!(a.cursor(), 1);
    }

    #[test]
    fn full_cycle_returns_to_start() {
        for n in 1..6 {
            let mut a = animator(n);
            for _ in 0..n {
                a.tick();
            }
            assert_eq!(a.cursor(), 0);
        }
    }

    #[test]
    fn empty_path_never_ticks() {
        let mut a = animator(0);
        assert_eq!(a.tick(), None);
        assert_eq!(a.advance(Duration::seconds(5.0)), None);
        assert_eq!(a.cursor(), 0);
    }

    #[test]
    fn advance_fires_per_interval() {
        let mut a = animator(5);
        assert_eq!(a.advance(Duration::seconds(0.4)), None);
        assert_eq!(a.cursor(), 0);
        assert_eq!(a.advance(Duration::seconds(0.7)).unwrap().longitude, 0.0);
        assert_eq!(a.cursor(), 1);
        // Two whole intervals at once; the latest position wins
        assert_eq!(a.advance(Duration::seconds(2.0)).unwrap().longitude, 2.0);
        assert_eq!(a.cursor(), 3);
    }

    #[test]
    fn stop_halts_ticks() {
        let mut a = animator(3);
        assert!(a.tick().is_some());
        a.stop();
        assert!(!a.is_running());
        assert_eq!(a.tick(), None);
        assert_eq!(a.advance(Duration::seconds(3.0)), None);
        assert_eq!(a.cursor(), 1);
    }

    #[test]
    fn resume_continues_from_the_cursor() {
        let mut a = animator(3);
        a.advance(Duration::seconds(0.5));
        a.stop();
        a.resume();
        assert!(a.is_running());
        // Time from before the stop doesn't count
        assert_eq!(a.advance(Duration::seconds(0.5)), None);
        assert_eq!(a.advance(Duration::seconds(0.5)).unwrap().longitude, 0.0);
        assert_eq!(a.cursor(), 1);
    }

    #[test]
    fn interval_must_be_positive() {
        assert!(Animator::new(path(2), Duration::ZERO).is_err());
    }
}
