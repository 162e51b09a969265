/// Replaces characters that are unsafe in file names.
///
/// Path separators, Windows-reserved characters and control characters
/// become `_`, double quotes become `'`. Leading/trailing whitespace and dots
/// are stripped; an empty result becomes `"file"`.
///
/// # Example
///
/// ```
/// use filelink::core::utils::escape_filename;
///
/// assert_eq!(escape_filename("report/2024*.pdf"), "report_2024_.pdf");
/// ```
pub fn escape_filename(filename: &str) -> String {
    let escaped: String = filename
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '<' | '>' | '|' => '_',
            '"' => '\'',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let trimmed = escaped.trim_matches(|c: char| c.is_whitespace() || c == '.');
    if trimmed.is_empty() {
        "file".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Formats a byte count for humans: `0 B`, `512 B`, `1.50 KB`, `2.00 GB`.
///
/// Values are divided by 1024 while they stay above 1024, up to TB.
pub fn humanbytes(size: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

    if size == 0 {
        return "0 B".to_string();
    }

    let mut value = size as f64;
    let mut unit = 0;
    while value > 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{} {}", size, UNITS[0])
    } else {
        format!("{:.2} {}", value, UNITS[unit])
    }
}

/// Formats a duration as `1h 2m 3s`, dropping leading zero units.
pub fn format_duration(duration: std::time::Duration) -> String {
    let secs = duration.as_secs();
    let (hours, minutes, seconds) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_escape_filename() {
        assert_eq!(escape_filename("movie.mp4"), "movie.mp4");
        assert_eq!(escape_filename("a/b\\c:d"), "a_b_c_d");
        assert_eq!(escape_filename("say \"hi\".txt"), "say 'hi'.txt");
        assert_eq!(escape_filename("  ..hidden.. "), "hidden");
        assert_eq!(escape_filename("..."), "file");
        assert_eq!(escape_filename("tab\there"), "tab_here");
    }

    #[test]
    fn test_humanbytes() {
        assert_eq!(humanbytes(0), "0 B");
        assert_eq!(humanbytes(512), "512 B");
        assert_eq!(humanbytes(1024), "1024 B");
        assert_eq!(humanbytes(1536), "1.50 KB");
        assert_eq!(humanbytes(5 * 1024 * 1024), "5.00 MB");
        assert_eq!(humanbytes(4 * 1024 * 1024 * 1024), "4.00 GB");
        assert_eq!(humanbytes(4 * 1024 * 1024 * 1024 + 1), "4.00 GB");
        assert_eq!(humanbytes(3 * 1024_u64.pow(4) * 1024), "3072.00 TB");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(5)), "5s");
        assert_eq!(format_duration(Duration::from_secs(65)), "1m 5s");
        assert_eq!(format_duration(Duration::from_secs(3725)), "1h 2m 5s");
    }
}
