use chrono::{DateTime, NaiveDateTime};

/// Display format for timestamps (day/month/year, 12-hour clock).
const DISPLAY_FORMAT: &str = "%-d/%-m/%Y, %-I:%M:%S %P";

/// Offset-less layouts the server is known to emit.
const NAIVE_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// Escapes untrusted note text for `inner_html`. Only line breaks survive,
/// as `<br>`.
pub(crate) fn note_content_html(content: &str) -> String {
    let mut out = String::with_capacity(content.len() + content.len() / 8);
    let mut chars = content.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push_str("<br>");
            }
            '\n' => out.push_str("<br>"),
            c => out.push(c),
        }
    }
    out
}

/// Formats a server timestamp for display. Unparseable input is shown as-is.
pub(crate) fn format_timestamp(raw: &str) -> String {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format(DISPLAY_FORMAT).to_string();
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.format(DISPLAY_FORMAT).to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// First line of a note body, shortened for list rows.
pub(crate) fn preview(content: &str, max_chars: usize) -> String {
    let line = content.lines().find(|l| !l.trim().is_empty()).unwrap_or("").trim();
    if line.chars().count() <= max_chars {
        return line.to_string();
    }
    let mut cut: String = line.chars().take(max_chars).collect();
    cut.push('…');
    cut
}
