//! Display formatting for times, durations, and sizes.

/// Format milliseconds as `MM:SS`.
pub fn format_time(ms: f64) -> String {
    let total_seconds = (ms.max(0.0) / 1000.0).floor() as u64;
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}

/// Format milliseconds as `MM:SS.mmm`.
pub fn format_time_ms(ms: f64) -> String {
    let ms = ms.max(0.0);
    let total_seconds = (ms / 1000.0).floor() as u64;
    let millis = (ms % 1000.0).floor() as u64;
    format!(
        "{:02}:{:02}.{:03}",
        total_seconds / 60,
        total_seconds % 60,
        millis
    )
}

/// Format milliseconds as a compact duration (`M:SS` or `H:MM:SS`).
pub fn format_duration(ms: f64) -> String {
    let total_seconds = (ms.max(0.0) / 1000.0).floor() as u64;
    if total_seconds < 60 {
        return format!("0:{total_seconds:02}");
    }
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

/// Format a byte count as a human-readable size.
pub fn format_bytes(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * 1024;
    const GIB: u64 = 1024 * 1024 * 1024;
    if bytes < KIB {
        format!("{bytes} B")
    } else if bytes < MIB {
        format!("{:.1} KB", bytes as f64 / KIB as f64)
    } else if bytes < GIB {
        format!("{:.1} MB", bytes as f64 / MIB as f64)
    } else {
        format!("{:.2} GB", bytes as f64 / GIB as f64)
    }
}

/// Tick spacing for a timeline ruler covering `duration_ms`.
pub fn tick_interval_ms(duration_ms: f64) -> f64 {
    if duration_ms <= 10_000.0 {
        1_000.0
    } else if duration_ms <= 30_000.0 {
        2_000.0
    } else if duration_ms <= 60_000.0 {
        5_000.0
    } else if duration_ms <= 180_000.0 {
        10_000.0
    } else if duration_ms <= 300_000.0 {
        30_000.0
    } else if duration_ms <= 600_000.0 {
        60_000.0
    } else {
        120_000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_formats() {
        assert_eq!(format_time(0.0), "00:00");
        assert_eq!(format_time(65_000.0), "01:05");
        assert_eq!(format_time_ms(65_432.1), "01:05.432");
        assert_eq!(format_time(-500.0), "00:00");
    }

    #[test]
    fn duration_formats() {
        assert_eq!(format_duration(5_000.0), "0:05");
        assert_eq!(format_duration(95_000.0), "1:35");
        assert_eq!(format_duration(3_725_000.0), "1:02:05");
    }

    #[test]
    fn byte_formats() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2_048), "2.0 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.0 MB");
        assert_eq!(format_bytes(3 * 1024 * 1024 * 1024), "3.00 GB");
    }

    #[test]
    fn tick_intervals_scale_with_duration() {
        assert_eq!(tick_interval_ms(8_000.0), 1_000.0);
        assert_eq!(tick_interval_ms(45_000.0), 5_000.0);
        assert_eq!(tick_interval_ms(240_000.0), 30_000.0);
        assert_eq!(tick_interval_ms(900_000.0), 120_000.0);
    }
}
