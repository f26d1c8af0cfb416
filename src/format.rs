//! Display names for participant identifiers.

/// Turns an email-like identifier into a display name
///
/// `jane.doe@mergington.edu` becomes `Jane Doe`. Identifiers without a usable local part are
/// returned unchanged.
pub fn display_name(identifier: &str) -> String {
    let local = identifier.split('@').next().unwrap_or_default();

    let name = local
        .split(['.', '_', '-'])
        .filter(|token| !token.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ");

    if name.is_empty() {
        identifier.to_owned()
    } else {
        name
    }
}

/// Upper-cases the first character, the rest is kept as-is
fn capitalize(token: &str) -> String {
    let mut chars = token.chars();

    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
