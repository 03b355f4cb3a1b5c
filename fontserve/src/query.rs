//! Query string handling for the fonts routes.

/// Split a raw query string into key/value pairs. No percent-decoding; the
/// parameters this API takes are plain tokens.
pub fn split_query(query: &str) -> Vec<(String, String)> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) => (key.to_string(), value.to_string()),
            None => (pair.to_string(), String::new()),
        })
        .collect()
}

/// Parse a comma-separated list parameter.
///
/// `"latin,latin-ext,"` becomes `["latin", "latin-ext"]`: split on one or
/// more commas, blank tokens discarded. Kept tokens are not trimmed, so a
/// padded token like `" latin "` goes through verbatim and matches nothing
/// downstream. An absent parameter (`None`) means "no filter"; a
/// present-but-blank one means an empty list, which as a filter matches
/// nothing.
pub fn list_param(raw: Option<&str>) -> Option<Vec<String>> {
    raw.map(|raw| {
        raw.split(',')
            .filter(|token| !token.trim().is_empty())
            .map(str::to_string)
            .collect()
    })
}
