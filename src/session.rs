use chrono::{DateTime, Local};

/// Wall-clock start and end of the session being recorded.
///
/// Only shown on the tracker page; it is not part of the saved workout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionClock {
    start: Option<DateTime<Local>>,
    end: Option<DateTime<Local>>,
}

impl SessionClock {
    pub fn start(&mut self) {
        self.start_at(Local::now());
    }

    /// Restarting clears a previous end time.
    pub fn start_at(&mut self, at: DateTime<Local>) {
        self.start = Some(at);
        self.end = None;
    }

    pub fn end(&mut self) {
        self.end_at(Local::now());
    }

    pub fn end_at(&mut self, at: DateTime<Local>) {
        self.end = Some(at);
    }

    pub fn started(&self) -> Option<DateTime<Local>> {
        self.start
    }

    pub fn ended(&self) -> Option<DateTime<Local>> {
        self.end
    }

    /// Whole minutes between start and end, rounded down. `None` until both
    /// are set.
    pub fn duration_minutes(&self) -> Option<i64> {
        match (self.start, self.end) {
            (Some(s), Some(e)) => Some((e - s).num_seconds().div_euclid(60)),
            _ => None,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// `HH:MM` in local time.
pub fn format_time(at: DateTime<Local>) -> String {
    at.format("%H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(h: u32, m: u32, s: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 1, 1, h, m, s).single().unwrap()
    }

    #[test]
    fn duration_needs_both_ends() {
        let mut clock = SessionClock::default();
        assert_eq!(clock.duration_minutes(), None);
        clock.start_at(at(10, 0, 0));
        assert_eq!(clock.duration_minutes(), None);
        clock.end_at(at(10, 45, 59));
        assert_eq!(clock.duration_minutes(), Some(45));
    }

    #[test]
    fn duration_rounds_down_when_end_precedes_start() {
        let mut clock = SessionClock::default();
        clock.start_at(at(10, 0, 30));
        clock.end_at(at(10, 0, 0));
        assert_eq!(clock.duration_minutes(), Some(-1));
    }

    #[test]
    fn restart_clears_end() {
        let mut clock = SessionClock::default();
        clock.start_at(at(9, 0, 0));
        clock.end_at(at(9, 30, 0));
        clock.start_at(at(11, 0, 0));
        assert_eq!(clock.ended(), None);
        clock.end_at(at(11, 0, 0) + Duration::minutes(61));
        assert_eq!(clock.duration_minutes(), Some(61));
        clock.reset();
        assert_eq!(clock.started(), None);
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(at(7, 5, 0)), "07:05");
    }
}
