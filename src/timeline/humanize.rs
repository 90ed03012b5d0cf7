//! Human-readable durations for timeline rows.

/// Renders whole hours and minutes, e.g. `7 hours 30 minutes`.
pub fn humanize_duration(seconds: i64) -> String {
    let seconds = seconds.max(0);
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;

    let unit = |n: i64, name: &str| {
        if n == 1 {
            format!("1 {}", name)
        } else {
            format!("{} {}s", n, name)
        }
    };

    match (hours, minutes) {
        (0, 0) => "less than a minute".to_string(),
        (0, m) => unit(m, "minute"),
        (h, 0) => unit(h, "hour"),
        (h, m) => format!("{} {}", unit(h, "hour"), unit(m, "minute")),
    }
}
