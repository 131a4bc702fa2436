//! Style flags and their ANSI SGR codes.
//!
//! Styles are requested as named boolean flags, e.g. `[("bold", true),
//! ("red", true)]`. Lower-case color names select the foreground color,
//! capitalized names select the background color.

use std::fmt;

/// SGR reset sequence appended after styled text.
pub const RESET: &str = "\x1b[0m";

/// Every recognized flag name with its SGR code.
const MARKUP_TABLE: [(&str, u8); 20] = [
    ("black", 30),
    ("red", 31),
    ("green", 32),
    ("yellow", 33),
    ("blue", 34),
    ("purple", 35),
    ("cyan", 36),
    ("white", 37),
    ("Black", 40),
    ("Red", 41),
    ("Green", 42),
    ("Yellow", 43),
    ("Blue", 44),
    ("Purple", 45),
    ("Cyan", 46),
    ("White", 47),
    ("bold", 1),
    ("light", 2),
    ("blink", 5),
    ("invert", 7),
];

/// One or more style flag names are not in the markup table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidMarkupError {
    /// The unrecognized names, in the order they were given.
    pub names: Vec<String>,
}

impl fmt::Display for InvalidMarkupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let quoted: Vec<String> = self.names.iter().map(|name| format!("{name:?}")).collect();
        write!(f, "unknown markup: {}", quoted.join(", "))
    }
}

impl std::error::Error for InvalidMarkupError {}

/// Look up the SGR code for a flag name.
#[must_use]
pub fn code_for(name: &str) -> Option<u8> {
    MARKUP_TABLE
        .iter()
        .find_map(|(flag, code)| (*flag == name).then_some(*code))
}

/// Names accepted by [`code_for`].
pub fn flag_names() -> impl Iterator<Item = &'static str> {
    MARKUP_TABLE.iter().map(|(name, _)| *name)
}

/// Resolve flags into SGR codes, keeping call order.
///
/// Every name is validated, including flags set to `false`; only truthy
/// flags contribute a code.
pub fn resolve(flags: &[(&str, bool)]) -> Result<Vec<u8>, InvalidMarkupError> {
    let mut codes = Vec::with_capacity(flags.len());
    let mut unknown = Vec::new();

    for &(name, enabled) in flags {
        match code_for(name) {
            Some(code) if enabled => codes.push(code),
            Some(_) => {}
            None => unknown.push(name.to_string()),
        }
    }

    if unknown.is_empty() {
        Ok(codes)
    } else {
        Err(InvalidMarkupError { names: unknown })
    }
}

/// Escape sequences that switch on every code, one `ESC[<code>m` each.
#[must_use]
pub fn sgr_prefix(codes: &[u8]) -> String {
    codes.iter().map(|code| format!("\x1b[{code}m")).collect()
}

/// Wrap `text` in the codes and a trailing reset.
///
/// Returns `text` unchanged when `codes` is empty.
#[must_use]
pub fn apply(text: &str, codes: &[u8]) -> String {
    if codes.is_empty() {
        return text.to_string();
    }
    let prefix = sgr_prefix(codes);
    let mut result = String::with_capacity(prefix.len() + text.len() + RESET.len());
    result.push_str(&prefix);
    result.push_str(text);
    result.push_str(RESET);
    result
}

/// Byte-level counterpart of [`apply`].
#[must_use]
pub fn apply_bytes(bytes: &[u8], codes: &[u8]) -> Vec<u8> {
    if codes.is_empty() {
        return bytes.to_vec();
    }
    let prefix = sgr_prefix(codes);
    let mut result = Vec::with_capacity(prefix.len() + bytes.len() + RESET.len());
    result.extend_from_slice(prefix.as_bytes());
    result.extend_from_slice(bytes);
    result.extend_from_slice(RESET.as_bytes());
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_foreground_codes() {
        assert_eq!(code_for("black"), Some(30));
        assert_eq!(code_for("purple"), Some(35));
        assert_eq!(code_for("white"), Some(37));
    }

    #[test]
    fn test_background_codes_are_capitalized() {
        assert_eq!(code_for("Red"), Some(41));
        assert_eq!(code_for("Cyan"), Some(46));
        assert_eq!(code_for("RED"), None);
    }

    #[test]
    fn test_attribute_codes() {
        assert_eq!(code_for("bold"), Some(1));
        assert_eq!(code_for("light"), Some(2));
        assert_eq!(code_for("blink"), Some(5));
        assert_eq!(code_for("invert"), Some(7));
    }

    #[test]
    fn test_flag_names_cover_table() {
        assert_eq!(flag_names().count(), 20);
        assert!(flag_names().all(|name| code_for(name).is_some()));
    }

    #[test]
    fn test_resolve_keeps_order_and_skips_false() {
        let codes = resolve(&[("red", true), ("bold", true), ("blink", false)]).unwrap();
        assert_eq!(codes, vec![31, 1]);
    }

    #[test]
    fn test_resolve_rejects_unknown_names() {
        let err = resolve(&[("bold", true), ("fuchsia", true), ("italic", false)]).unwrap_err();
        assert_eq!(err.names, vec!["fuchsia".to_string(), "italic".to_string()]);
        assert_eq!(err.to_string(), "unknown markup: \"fuchsia\", \"italic\"");
    }

    #[test]
    fn test_apply() {
        assert_eq!(apply("text", &[1]), "\x1b[1mtext\x1b[0m");
        assert_eq!(apply("x", &[31, 1]), "\x1b[31m\x1b[1mx\x1b[0m");
        assert_eq!(apply("plain", &[]), "plain");
    }

    #[test]
    fn test_apply_bytes() {
        assert_eq!(apply_bytes(b"ab", &[32]), b"\x1b[32mab\x1b[0m".to_vec());
        assert_eq!(apply_bytes(b"ab", &[]), b"ab".to_vec());
    }
}
