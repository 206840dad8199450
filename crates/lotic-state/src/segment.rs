//! Shared key-segment parsing for the state uri types.

/// Returns the value of the segment at `index`, stripping a `key=` prefix
/// and dropping `{placeholder}` values.
pub(crate) fn segment_value(split: &[&str], index: usize) -> Option<String> {
    let raw = split.get(index)?;
    let value = raw.rsplit('=').next().unwrap_or(raw);

    if value.is_empty() || (value.starts_with('{') && value.ends_with('}')) {
        return None;
    }

    Some(value.to_string())
}
