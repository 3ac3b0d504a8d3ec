use crate::config::TimeFormat;
use crate::schedule::ClockTime;

/// Format seconds as zero-padded "HH:MM:SS". Negative input clamps to zero.
pub fn format_hms(secs: i64) -> String {
    let secs = secs.max(0);
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

/// Format a clock time as "HH:MM" or "H:MMAM"; unknown times render "--:--".
pub fn format_clock(time: Option<ClockTime>, format: TimeFormat) -> String {
    let Some(t) = time else {
        return "--:--".to_string();
    };
    match format {
        TimeFormat::H24 => format!("{:02}:{:02}", t.hour, t.minute),
        TimeFormat::H12 => {
            let period = if t.hour >= 12 { "PM" } else { "AM" };
            let hour = match t.hour % 12 {
                0 => 12,
                h => h,
            };
            format!("{}:{:02}{}", hour, t.minute, period)
        }
    }
}

/// Trim geocoder decorations off a place name: "Dhaka District, Bangladesh" -> "Dhaka".
pub fn normalize_city_name(city: &str) -> String {
    let mut name = strip_parentheticals(city);
    for suffix in [" District", " City", " Metropolitan Area"] {
        name = remove_case_insensitive(&name, suffix);
    }
    name.split(',').next().unwrap_or("").trim().to_string()
}

fn strip_parentheticals(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find(" (") {
        match rest[start..].find(')') {
            Some(end) => {
                out.push_str(&rest[..start]);
                rest = &rest[start + end + 1..];
            }
            None => break,
        }
    }
    out.push_str(rest);
    out.trim().to_string()
}

fn remove_case_insensitive(s: &str, needle: &str) -> String {
    let lower = s.to_lowercase();
    match lower.find(&needle.to_lowercase()) {
        // ASCII needles keep byte offsets aligned between `s` and `lower`
        Some(i) if s.is_char_boundary(i) && s.is_char_boundary(i + needle.len()) => {
            format!("{}{}", &s[..i], &s[i + needle.len()..]).trim().to_string()
        }
        _ => s.trim().to_string(),
    }
}
