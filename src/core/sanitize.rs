// src/core/sanitize.rs

/// Replace the handful of entities the room site actually emits.
pub fn normalize_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// Decode a response body. The room site serves ISO-8859-1, so anything that
/// is not valid UTF-8 is read byte-per-char as Latin-1.
pub fn decode_body(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

/// Case- and whitespace-insensitive comparison key for room labels
/// ("CAB  g 11" == "CAB G 11").
pub fn label_key(s: &str) -> String {
    normalize_ws(s).to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entities_decode_amp_last() {
        assert_eq!(normalize_entities("a&nbsp;&amp;nbsp;b"), "a &nbsp;b");
    }

    #[test]
    fn ws_collapses_and_trims() {
        assert_eq!(normalize_ws("  Lineare \n\t Algebra  "), "Lineare Algebra");
    }

    #[test]
    fn latin1_fallback() {
        // "Mär" in ISO-8859-1
        assert_eq!(decode_body(&[0x4d, 0xe4, 0x72]), "Mär");
        assert_eq!(decode_body("Mär".as_bytes()), "Mär");
    }

    #[test]
    fn label_key_ignores_case_and_spacing() {
        assert_eq!(label_key(" CAB  g 11"), label_key("cab G 11"));
    }
}
