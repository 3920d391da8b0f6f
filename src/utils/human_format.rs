//! Human-readable formatting for progress and summary log lines

use std::time::Duration;

/// Formats a duration to a compact human-readable string
pub fn format_duration(duration: Duration) -> String {
    let millis = duration.as_millis() as u64;

    if millis == 0 {
        return "0ms".to_string();
    }

    if millis < 1000 {
        format!("{}ms", millis)
    } else if millis < 60_000 {
        let seconds = millis as f64 / 1000.0;
        if seconds >= 10.0 {
            format!("{:.1}s", seconds)
        } else {
            format!("{:.2}s", seconds)
        }
    } else if millis < 3_600_000 {
        let total_seconds = millis / 1000;
        let minutes = total_seconds / 60;
        let seconds = total_seconds % 60;

        if seconds == 0 {
            format!("{}m", minutes)
        } else {
            format!("{}m{}s", minutes, seconds)
        }
    } else {
        let total_seconds = millis / 1000;
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if seconds == 0 && minutes == 0 {
            format!("{}h", hours)
        } else if seconds == 0 {
            format!("{}h{}m", hours, minutes)
        } else {
            format!("{}h{}m{}s", hours, minutes, seconds)
        }
    }
}

/// Formats a duration as fractional minutes, e.g. `3.5 min`
pub fn format_minutes(duration: Duration) -> String {
    format!("{:.1} min", duration.as_secs_f64() / 60.0)
}

/// Share of `part` in `total` as a percentage with one decimal
pub fn format_percentage(part: usize, total: usize) -> String {
    if total == 0 {
        return "100.0%".to_string();
    }
    format!("{:.1}%", part as f64 / total as f64 * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::ZERO), "0ms");
        assert_eq!(format_duration(Duration::from_millis(500)), "500ms");
        assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
        assert_eq!(format_duration(Duration::from_secs(10)), "10.0s");
        assert_eq!(format_duration(Duration::from_secs(60)), "1m");
        assert_eq!(format_duration(Duration::from_secs(90)), "1m30s");
        assert_eq!(format_duration(Duration::from_secs(3600)), "1h");
        assert_eq!(format_duration(Duration::from_secs(3660)), "1h1m");
        assert_eq!(format_duration(Duration::from_secs(3661)), "1h1m1s");
    }

    #[test]
    fn test_format_minutes() {
        assert_eq!(format_minutes(Duration::from_secs(0)), "0.0 min");
        assert_eq!(format_minutes(Duration::from_secs(90)), "1.5 min");
        assert_eq!(format_minutes(Duration::from_secs(3600)), "60.0 min");
    }

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(2, 5), "40.0%");
        assert_eq!(format_percentage(1, 3), "33.3%");
        assert_eq!(format_percentage(5, 5), "100.0%");
        assert_eq!(format_percentage(0, 0), "100.0%");
    }
}
