use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};

/// route directory name for documents without a route id
pub const UNKNOWN_ROUTE: &str = "unknown";

/// one route on one service day, stored as a Hive-style directory
/// `{route}/Year={YYYY}/Month={MM}/Day={DD}` under a stage directory.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RoutePartition {
    pub route_id: String,
    pub date: NaiveDate,
}

impl RoutePartition {
    pub fn new(route_id: Option<&str>, date: NaiveDate) -> RoutePartition {
        let route_id = match route_id.map(str::trim) {
            Some(r) if !r.is_empty() => sanitize_path_component(r),
            _ => UNKNOWN_ROUTE.to_string(),
        };
        RoutePartition { route_id, date }
    }

    /// the partition directory below `{root}/{stage}`
    pub fn directory(&self, root: &Path, stage: &str) -> PathBuf {
        root.join(stage)
            .join(&self.route_id)
            .join(format!("Year={}", self.date.year()))
            .join(format!("Month={:02}", self.date.month()))
            .join(format!("Day={:02}", self.date.day()))
    }

    /// reads the value of a `Key=value` partition directory name
    pub fn parse_component(name: &str, key: &str) -> Option<u32> {
        let (k, v) = name.split_once('=')?;
        if k != key {
            return None;
        }
        v.parse().ok()
    }

    pub fn from_components(route_id: &str, year: &str, month: &str, day: &str) -> Option<RoutePartition> {
        let y = Self::parse_component(year, "Year")?;
        let m = Self::parse_component(month, "Month")?;
        let d = Self::parse_component(day, "Day")?;
        let date = NaiveDate::from_ymd_opt(y as i32, m, d)?;
        Some(RoutePartition {
            route_id: route_id.to_string(),
            date,
        })
    }
}

/// replaces characters that are unsafe in a file or directory name. a
/// leading dot is escaped so that ids cannot name hidden or parent directories.
pub fn sanitize_path_component(value: &str) -> String {
    let cleaned: String = value
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() || cleaned.starts_with('.') {
        format!("_{cleaned}")
    } else {
        cleaned
    }
}

#[cfg(test)]
mod test {
    use super::{sanitize_path_component, RoutePartition};
    use chrono::NaiveDate;
    use std::path::{Path, PathBuf};

    #[test]
    fn test_directory_layout() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let partition = RoutePartition::new(Some("Red"), date);
        let expected: PathBuf = ["/data", "raw", "Red", "Year=2024", "Month=05", "Day=01"]
            .iter()
            .collect();
        assert_eq!(partition.directory(Path::new("/data"), "raw"), expected);
        assert_eq!(RoutePartition::new(None, date).route_id, "unknown");
        assert_eq!(RoutePartition::new(Some("  "), date).route_id, "unknown");
    }

    #[test]
    fn test_from_components() {
        let partition = RoutePartition::from_components("Red", "Year=2024", "Month=05", "Day=01");
        assert_eq!(
            partition.map(|p| p.date),
            NaiveDate::from_ymd_opt(2024, 5, 1)
        );
        assert!(RoutePartition::from_components("Red", "Year=2024", "Month=13", "Day=01").is_none());
        assert!(RoutePartition::from_components("Red", "2024", "Month=05", "Day=01").is_none());
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize_path_component("Green-B"), "Green-B");
        assert_eq!(sanitize_path_component("a/b c"), "a_b_c");
        assert_eq!(sanitize_path_component(".."), "_..");
        assert_eq!(sanitize_path_component(""), "_");
    }
}
