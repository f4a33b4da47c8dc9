//! In-world calendar: four 28-day seasons per year.
//!
//! The engine never consults a wall clock. Every date-sensitive operation
//! takes `today: WorldDate` from the caller, so hosts (and tests) control
//! time explicitly.

use serde::{Deserialize, Serialize};

pub const DAYS_PER_SEASON: i32 = 28;
pub const DAYS_PER_YEAR: i32 = 112;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
}

impl Season {
    pub fn index(self) -> i32 {
        match self {
            Season::Spring => 0,
            Season::Summer => 1,
            Season::Fall => 2,
            Season::Winter => 3,
        }
    }

    fn from_index(index: i32) -> Season {
        match index.rem_euclid(4) {
            0 => Season::Spring,
            1 => Season::Summer,
            2 => Season::Fall,
            _ => Season::Winter,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Fall => "fall",
            Season::Winter => "winter",
        }
    }
}

/// A calendar date: year (1-based), season, day of month (1..=28).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WorldDate {
    pub year: i32,
    pub season: Season,
    pub day: u8,
}

impl Default for WorldDate {
    fn default() -> Self {
        WorldDate::new(1, Season::Spring, 1)
    }
}

impl WorldDate {
    pub fn new(year: i32, season: Season, day: u8) -> Self {
        WorldDate { year, season, day }
    }

    /// Day within the year, 1..=112.
    pub fn day_of_year(&self) -> i32 {
        self.season.index() * DAYS_PER_SEASON + self.day as i32
    }

    /// Absolute day count since year 1, spring 1 (which is day 1).
    pub fn total_days(&self) -> i32 {
        (self.year - 1) * DAYS_PER_YEAR + self.day_of_year()
    }

    /// Offset by `days`, normalizing across season and year boundaries.
    /// Underflow clamps to the first day of year 1.
    pub fn add_days(&self, days: i32) -> WorldDate {
        let total = (self.total_days() + days).max(1);
        let zero_based = total - 1;
        let year = zero_based / DAYS_PER_YEAR + 1;
        let day_of_year = zero_based % DAYS_PER_YEAR;
        WorldDate {
            year,
            season: Season::from_index(day_of_year / DAYS_PER_SEASON),
            day: (day_of_year % DAYS_PER_SEASON + 1) as u8,
        }
    }
}

impl PartialOrd for WorldDate {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for WorldDate {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.total_days().cmp(&other.total_days())
    }
}

impl std::fmt::Display for WorldDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}, year {}", self.season.name(), self.day, self.year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_days_epoch() {
        assert_eq!(WorldDate::default().total_days(), 1);
        assert_eq!(WorldDate::new(1, Season::Winter, 28).total_days(), 112);
        assert_eq!(WorldDate::new(2, Season::Spring, 1).total_days(), 113);
    }

    #[test]
    fn test_day_of_year_bounds() {
        assert_eq!(WorldDate::new(3, Season::Spring, 1).day_of_year(), 1);
        assert_eq!(WorldDate::new(3, Season::Winter, 28).day_of_year(), 112);
    }

    #[test]
    fn test_add_days_rolls_seasons_and_years() {
        let d = WorldDate::new(1, Season::Spring, 27);
        assert_eq!(d.add_days(1), WorldDate::new(1, Season::Spring, 28));
        assert_eq!(d.add_days(2), WorldDate::new(1, Season::Summer, 1));
        assert_eq!(d.add_days(86), WorldDate::new(2, Season::Spring, 1));
    }

    #[test]
    fn test_add_days_clamps_underflow() {
        let d = WorldDate::new(1, Season::Spring, 3);
        assert_eq!(d.add_days(-10), WorldDate::default());
    }

    #[test]
    fn test_ordering_by_total_days() {
        let a = WorldDate::new(1, Season::Winter, 5);
        let b = WorldDate::new(2, Season::Spring, 1);
        assert!(a < b);
    }

    #[test]
    fn test_serde_shape() {
        let d = WorldDate::new(2, Season::Fall, 14);
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"Year": 2, "Season": "fall", "Day": 14})
        );
    }
}
