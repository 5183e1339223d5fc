/// Fallback columns for canonical feature names, tried in order after an
/// exact (case-insensitive, trimmed) column match has failed.
///
/// Raw tick feeds only carry `price`, while models are trained on OHLCV
/// naming. Changing an entry silently changes what every model is fed.
pub const COLUMN_ALIASES: &[(&str, &[&str])] = &[
    ("open", &["Open", "price"]),
    ("high", &["High", "price"]),
    ("low", &["Low", "price"]),
    ("volume", &["Volume", "price"]),
    ("close", &["Close", "price"]),
    ("close/last", &["Close", "price"]),
];

const LAG_MARKER: &str = "_lag";

/// How a metadata feature name maps onto the history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureSpec<'a> {
    /// Value of `column` on the latest record.
    Current { column: &'a str },
    /// Value of `column`, `lag` records before the latest one.
    Lagged { column: &'a str, lag: usize },
}

impl<'a> FeatureSpec<'a> {
    pub fn column(&self) -> &'a str {
        match self {
            FeatureSpec::Current { column } | FeatureSpec::Lagged { column, .. } => column,
        }
    }
}

/// Parses `<base>_lag<N>` (N a positive integer) into a lagged feature;
/// any other name is a current-value feature.
pub fn parse_feature_name(name: &str) -> FeatureSpec<'_> {
    let name = name.trim();
    if let Some((base, suffix)) = name.rsplit_once(LAG_MARKER) {
        let is_digits = !suffix.is_empty() && suffix.bytes().all(|b| b.is_ascii_digit());
        if is_digits && !base.is_empty() {
            if let Ok(lag) = suffix.parse::<usize>() {
                if lag > 0 {
                    return FeatureSpec::Lagged { column: base, lag };
                }
            }
        }
    }
    FeatureSpec::Current { column: name }
}

/// Alias candidates for a base name; empty when no alias applies.
pub fn alias_candidates(base: &str) -> &'static [&'static str] {
    let key = base.trim().to_lowercase();
    COLUMN_ALIASES
        .iter()
        .find(|(canonical, _)| *canonical == key)
        .map(|(_, candidates)| *candidates)
        .unwrap_or(&[])
}

/// Resolves `base` against the available column names.
///
/// Priority: exact match ignoring case and surrounding whitespace, then the
/// alias table. `None` means the caller zero-fills.
pub fn resolve_column<'c>(columns: &'c [String], base: &str) -> Option<&'c str> {
    let wanted = base.trim().to_lowercase();

    if let Some(found) = columns.iter().find(|c| c.trim().to_lowercase() == wanted) {
        return Some(found.as_str());
    }

    alias_candidates(base).iter().find_map(|candidate| {
        columns
            .iter()
            .find(|c| c.as_str() == *candidate)
            .map(String::as_str)
    })
}
