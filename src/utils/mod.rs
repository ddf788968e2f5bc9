use std::collections::HashSet;

use crate::model::Column;

/// Parses column names, dropping duplicates while keeping the first-seen order.
pub fn parse_columns<I, S>(values: I) -> Result<Vec<Column>, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<Column> = Vec::new();
    let mut seen: HashSet<Column> = HashSet::new();
    for value in values {
        let raw = value.as_ref().trim();
        if raw.is_empty() {
            continue;
        }
        let column = Column::parse(raw).ok_or_else(|| format!("unknown column '{raw}'"))?;
        if seen.insert(column) {
            out.push(column);
        }
    }
    Ok(out)
}

pub fn validate_bundle_name(name: &str) -> Result<(), String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("name is empty".to_string());
    }
    if trimmed.contains('/') || trimmed.contains('\\') {
        return Err("name must not contain path separators".to_string());
    }
    if !trimmed.to_ascii_lowercase().ends_with(".css") {
        return Err("name must end with .css".to_string());
    }
    Ok(())
}

pub fn human_bytes(n: u64) -> String {
    if n < 1024 {
        return format!("{n} B");
    }
    let kb = n as f64 / 1024.0;
    if kb < 1024.0 {
        return format!("{kb:.1} KB");
    }
    format!("{:.1} MB", kb / 1024.0)
}
