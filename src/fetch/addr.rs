use crate::error::FetchError;

/// Canonical `0x`-prefixed, lowercase, 64-digit form of an account address.
///
/// The ledger abbreviates addresses inconsistently (`0x1`, `0x01`, the
/// full 32-byte form); normalizing lets them be used as cache keys and
/// compared for equality.
pub fn normalize_address(address: &str) -> Result<String, FetchError> {
    let digits = address
        .strip_prefix("0x")
        .ok_or_else(|| FetchError::Malformed(format!("address missing 0x prefix: {address}")))?;

    if digits.is_empty() || digits.len() > 64 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(FetchError::Malformed(format!("bad address: {address}")));
    }

    Ok(format!("0x{:0>64}", digits.to_ascii_lowercase()))
}

/// Decodes a hex-encoded UTF-8 string the way the ledger returns Move
/// identifiers, e.g. `0x706f6f6c` -> `pool`.
pub fn hex_to_utf8(hex: &str) -> Result<String, FetchError> {
    let digits = hex.strip_prefix("0x").unwrap_or(hex);
    if digits.len() % 2 != 0 {
        return Err(FetchError::Malformed(format!("odd-length hex: {hex}")));
    }

    let mut bytes = Vec::with_capacity(digits.len() / 2);
    for i in (0..digits.len()).step_by(2) {
        let byte = u8::from_str_radix(&digits[i..i + 2], 16)
            .map_err(|_| FetchError::Malformed(format!("bad hex: {hex}")))?;
        bytes.push(byte);
    }

    String::from_utf8(bytes).map_err(|_| FetchError::Malformed(format!("hex is not utf-8: {hex}")))
}

/// Joins an address, module and struct name into a Move type tag.
pub fn compose_type(address: &str, module: &str, name: &str) -> String {
    format!("{address}::{module}::{name}")
}

/// Splits the generic arguments of a type tag at the top nesting level,
/// so `P<A<X, Y>, B>` yields `["A<X, Y>", "B"]`.
pub fn split_generic_types(type_tag: &str) -> Result<Vec<String>, FetchError> {
    let open = type_tag
        .find('<')
        .ok_or_else(|| FetchError::Malformed(format!("type tag has no generics: {type_tag}")))?;
    if !type_tag.ends_with('>') {
        return Err(FetchError::Malformed(format!(
            "unterminated generics: {type_tag}"
        )));
    }

    let inner = &type_tag[open + 1..type_tag.len() - 1];
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;

    for (i, c) in inner.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => {
                depth = depth.checked_sub(1).ok_or_else(|| {
                    FetchError::Malformed(format!("unbalanced generics: {type_tag}"))
                })?;
            }
            ',' if depth == 0 => {
                parts.push(inner[start..i].trim().to_string());
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(FetchError::Malformed(format!(
            "unbalanced generics: {type_tag}"
        )));
    }

    parts.push(inner[start..].trim().to_string());
    if parts.iter().any(|part| part.is_empty()) {
        return Err(FetchError::Malformed(format!(
            "empty generic argument: {type_tag}"
        )));
    }

    Ok(parts)
}
