use tracing::warn;

/// Splits `Name: Value` header strings at the first colon.
///
/// Entries without a colon or with an empty name are dropped.
pub fn parse_forward_headers(raw: &[String]) -> Vec<(String, String)> {
    raw.iter()
        .filter_map(|header| match header.split_once(':') {
            Some((name, value)) if !name.trim().is_empty() => {
                Some((name.trim().to_string(), value.trim().to_string()))
            }
            _ => {
                warn!(header = %header, "Ignoring malformed forward header");
                None
            }
        })
        .collect()
}
