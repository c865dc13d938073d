/// Trim whitespace and strip surrounding quote characters.
pub fn clean_str(raw: &str) -> &str {
    raw.trim().trim_matches('"').trim()
}

/// Parse a share cell such as `"12.5"` or `12.5` into a finite `f64`.
///
/// Returns `None` for anything that is not a finite decimal number, so a
/// stray `NaN` or `inf` in the file can never leak into a sum.
pub fn parse_share(raw: &str) -> Option<f64> {
    clean_str(raw).parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Display name of a column: the header text without its quotes.
pub fn display_name(column: &str) -> &str {
    clean_str(column)
}

/// True for the date pseudo-column, whether or not the header is quoted.
pub fn is_date_column(column: &str) -> bool {
    display_name(column) == "Date"
}
