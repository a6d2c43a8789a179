//! Restricted character-set string types: NumericString, PrintableString,
//! IA5String, VisibleString, plus the wide-character BmpString and
//! UniversalString.

/// Validates that `s` contains only digits and spaces (NumericString,
/// `spec.md` §4.2).
pub fn validate_numeric(s: &str) -> Result<(), String> {
    match s.chars().find(|c| !(c.is_ascii_digit() || *c == ' ')) {
        Some(c) => Err(format!("{c:?} is not permitted in a NumericString")),
        None => Ok(()),
    }
}

const PRINTABLE_EXTRA: &[char] = &[' ', '\'', '(', ')', '+', ',', '-', '.', '/', ':', '=', '?'];

/// Validates PrintableString's permitted alphabet:
/// `[a-zA-Z0-9 '()+,\-./:=?]*`.
pub fn validate_printable(s: &str) -> Result<(), String> {
    match s
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || PRINTABLE_EXTRA.contains(c)))
    {
        Some(c) => Err(format!("{c:?} is not permitted in a PrintableString")),
        None => Ok(()),
    }
}

/// Validates IA5String: strict US-ASCII (0..=127).
pub fn validate_ia5(s: &str) -> Result<(), String> {
    match s.chars().find(|c| !c.is_ascii()) {
        Some(c) => Err(format!("{c:?} is not permitted in an IA5String")),
        None => Ok(()),
    }
}

/// Validates VisibleString: printable ASCII, `chr(32)..=chr(126)`.
pub fn validate_visible(s: &str) -> Result<(), String> {
    match s.chars().find(|c| !(' '..='~').contains(c)) {
        Some(c) => Err(format!("{c:?} is not permitted in a VisibleString")),
        None => Ok(()),
    }
}

/// Encodes a BmpString as raw UTF-16BE code units.
pub fn encode_bmp(units: &[u16]) -> Vec<u8> {
    units.iter().flat_map(|u| u.to_be_bytes()).collect()
}

/// Decodes raw UTF-16BE content into its code units.
pub fn decode_bmp(content: &[u8]) -> Result<Vec<u16>, String> {
    if content.len() % 2 != 0 {
        return Err("BmpString content length must be even".into());
    }
    Ok(content
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
        .collect())
}

/// Encodes a UniversalString as raw UTF-32BE code points.
pub fn encode_universal(chars: &[char]) -> Vec<u8> {
    chars
        .iter()
        .flat_map(|c| (*c as u32).to_be_bytes())
        .collect()
}

/// Decodes raw UTF-32BE content into its code points.
pub fn decode_universal(content: &[u8]) -> Result<Vec<char>, String> {
    if content.len() % 4 != 0 {
        return Err("UniversalString content length must be a multiple of 4".into());
    }
    content
        .chunks_exact(4)
        .map(|quad| {
            let code = u32::from_be_bytes([quad[0], quad[1], quad[2], quad[3]]);
            char::from_u32(code).ok_or_else(|| format!("{code:#x} is not a valid code point"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_string_rejects_letters() {
        assert!(validate_numeric("12345").is_ok());
        assert!(validate_numeric("123x45").is_err());
    }

    #[test]
    fn printable_string_rejects_semicolon() {
        assert!(validate_printable("Hello, World").is_ok());
        assert!(validate_printable("a;b").is_err());
    }

    #[test]
    fn visible_string_rejects_control_chars() {
        assert!(validate_visible("visible").is_ok());
        assert!(validate_visible("\u{1}bad").is_err());
    }

    #[test]
    fn bmp_round_trips() {
        let units: Vec<u16> = "hello".encode_utf16().collect();
        let encoded = encode_bmp(&units);
        assert_eq!(decode_bmp(&encoded).unwrap(), units);
    }

    #[test]
    fn universal_round_trips() {
        let chars: Vec<char> = "hello \u{1F600}".chars().collect();
        let encoded = encode_universal(&chars);
        assert_eq!(decode_universal(&encoded).unwrap(), chars);
    }
}
