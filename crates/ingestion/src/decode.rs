//! Byte-to-text decoding for the supported encodings.

use demanda_core::{Error, Result, TextEncoding};
use encoding_rs::UTF_8;
use std::borrow::Cow;

/// Decode raw bytes as text.
///
/// Latin-1 maps every byte to the code point of the same value and never
/// fails. UTF-8 is strict: malformed sequences are an error. A byte order
/// mark is kept as part of the text.
pub fn decode(bytes: &[u8], encoding: TextEncoding) -> Result<Cow<'_, str>> {
    match encoding {
        TextEncoding::Latin1 => Ok(Cow::Owned(bytes.iter().map(|&b| char::from(b)).collect())),
        TextEncoding::Utf8 => UTF_8
            .decode_without_bom_handling_and_without_replacement(bytes)
            .ok_or_else(|| Error::decode("invalid UTF-8 byte sequence")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latin1_high_bytes() {
        // "Peñalolén" in Latin-1
        let bytes = b"Pe\xf1alol\xe9n";
        assert_eq!(decode(bytes, TextEncoding::Latin1).unwrap(), "Peñalolén");
    }

    #[test]
    fn test_latin1_never_fails() {
        let bytes: Vec<u8> = (0..=255u8).collect();
        let text = decode(&bytes, TextEncoding::Latin1).unwrap();
        assert_eq!(text.chars().count(), 256);
    }

    #[test]
    fn test_latin1_ascii_unchanged() {
        let text = decode(b"DEPARTAMENTO;CONSUMO\nX;1,5\n", TextEncoding::Latin1).unwrap();
        assert_eq!(text, "DEPARTAMENTO;CONSUMO\nX;1,5\n");
    }

    #[test]
    fn test_utf8_strict() {
        assert_eq!(decode("Peñalolén".as_bytes(), TextEncoding::Utf8).unwrap(), "Peñalolén");
        let err = decode(b"Pe\xf1a", TextEncoding::Utf8).unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn test_utf8_as_latin1_mojibake() {
        let text = decode("ñ".as_bytes(), TextEncoding::Latin1).unwrap();
        assert_eq!(text, "\u{c3}\u{b1}");
    }
}
