use chrono::{DateTime, Utc};
use unicode_width::UnicodeWidthStr;

/// Format a datetime according to the configured date format.
///
/// If `date_format` is `"relative"` (or empty), displays relative times like
/// `"2h ago"` or `"in 3d"`. Otherwise, uses `strftime`-style formatting.
pub(crate) fn format_date(dt: &DateTime<Utc>, date_format: &str) -> String {
    format_date_at(dt, date_format, Utc::now())
}

fn format_date_at(dt: &DateTime<Utc>, date_format: &str, now: DateTime<Utc>) -> String {
    if date_format.is_empty() || date_format == "relative" {
        let secs = dt.signed_duration_since(now).num_seconds();
        let span = format_span(secs.unsigned_abs());
        if span == "now" {
            span
        } else if secs > 0 {
            format!("in {span}")
        } else {
            format!("{span} ago")
        }
    } else {
        dt.format(date_format).to_string()
    }
}

/// Compact span like `"5m"`, `"2h"`, `"3d"`, `"1w"`.
fn format_span(secs: u64) -> String {
    let minutes = secs / 60;
    if minutes < 1 {
        return "now".to_owned();
    }
    if minutes < 60 {
        return format!("{minutes}m");
    }
    let hours = minutes / 60;
    if hours < 24 {
        return format!("{hours}h");
    }
    let days = hours / 24;
    if days < 7 {
        return format!("{days}d");
    }
    if days < 30 {
        return format!("{}w", days / 7);
    }
    if days < 365 {
        return format!("{}mo", days / 30);
    }
    format!("{}y", days / 365)
}

/// Cut `s` to at most `width` terminal columns, marking the cut with `…`.
pub(crate) fn truncate(s: &str, width: usize) -> String {
    if s.width() <= width {
        return s.to_owned();
    }
    if width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in s.chars() {
        let w = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}
