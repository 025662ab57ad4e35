use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

pub const NOT_AVAILABLE: &str = "N/A";
const ID_EDGE_CHARS: usize = 4;
const BYTES_PER_MB: f64 = 1e6;

/// Parses the timestamp shapes the document service emits. Offset-less
/// values are taken as UTC.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, pattern) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// `"Jun 5, 2024 16:26"`, or `N/A` when absent or unparseable.
#[must_use]
pub fn format_updated_at(raw: Option<&str>) -> String {
    raw.and_then(parse_timestamp).map_or_else(
        || NOT_AVAILABLE.to_string(),
        |dt| dt.format("%b %-d, %Y %H:%M").to_string(),
    )
}

/// First and last four characters joined by `...`. Ids of eight characters
/// or fewer overlap: `"short"` becomes `"shor...hort"`.
#[must_use]
pub fn abbreviate_id(id: &str) -> String {
    let chars: Vec<char> = id.chars().collect();
    let head: String = chars.iter().take(ID_EDGE_CHARS).collect();
    let tail: String = chars[chars.len().saturating_sub(ID_EDGE_CHARS)..]
        .iter()
        .collect();
    format!("{head}...{tail}")
}

#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_size_mb(size_in_bytes: u64) -> String {
    format!("{:.2}", size_in_bytes as f64 / BYTES_PER_MB)
}

#[must_use]
pub fn format_metadata(metadata: &serde_json::Value) -> String {
    match metadata {
        serde_json::Value::Null => NOT_AVAILABLE.to_string(),
        other => other.to_string(),
    }
}
