use std::time::Duration;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// `m:ss`, minutes unbounded
pub fn format_clock(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

pub fn format_position(position: Duration, total_secs: u32) -> String {
    format!(
        "{} / {}",
        format_clock(position.as_secs()),
        format_clock(u64::from(total_secs))
    )
}

/// Cut `text` to at most `width` terminal columns, ending in `…` when cut
pub fn truncate(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push('…');
    out
}

/// Rounded percentage for display
pub fn percent_label(percent: f64) -> String {
    format!("{}%", percent.round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0), "0:00");
        assert_eq!(format_clock(55), "0:55");
        assert_eq!(format_clock(61), "1:01");
        assert_eq!(format_clock(3600), "60:00");
    }

    #[test]
    fn test_format_position() {
        assert_eq!(format_position(Duration::from_millis(12_900), 48), "0:12 / 0:48");
    }

    #[test]
    fn test_truncate_ascii() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly", 7), "exactly");
        assert_eq!(truncate("too long here", 8), "too lon…");
        assert_eq!(truncate("abc", 0), "");
    }

    #[test]
    fn test_truncate_wide_chars() {
        // each ideograph takes two columns
        assert_eq!(truncate("洞窟の寓話", 5), "洞窟…");
        assert!(truncate("洞窟の寓話", 5).width() <= 5);
    }

    #[test]
    fn test_percent_label() {
        assert_eq!(percent_label(0.0), "0%");
        assert_eq!(percent_label(12.5), "13%");
        assert_eq!(percent_label(37.49), "37%");
    }
}
