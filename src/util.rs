//! Byte decoding for markup read from files or the network.

use std::borrow::Cow;

/// Decode bytes to a string, handling various encodings.
///
/// This function:
/// 1. First tries UTF-8 (handles BOM automatically via encoding_rs)
/// 2. If malformed, tries the hint encoding (from `<meta charset>`)
/// 3. Falls back to Windows-1252 (common in legacy pages)
///
/// Uses `Cow<str>` to avoid allocation when the input is valid UTF-8.
///
/// # Examples
///
/// ```
/// use turndown::util::decode_text;
///
/// assert_eq!(decode_text("Hello".as_bytes(), None), "Hello");
/// // 0xE9 is "é" in Windows-1252 but not valid UTF-8
/// assert_eq!(decode_text(b"caf\xE9", None), "café");
/// ```
pub fn decode_text<'a>(bytes: &'a [u8], hint_encoding: Option<&str>) -> Cow<'a, str> {
    // Try UTF-8 first (handles BOM automatically)
    let (result, _encoding, malformed) = encoding_rs::UTF_8.decode(bytes);

    if !malformed {
        return result;
    }

    if let Some(name) = hint_encoding
        && let Some(encoding) = encoding_rs::Encoding::for_label(name.as_bytes())
    {
        let (result, _, _) = encoding.decode(bytes);
        return result;
    }

    let (result, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    result
}

/// Decode markup, using its own `<meta charset>` declaration as the hint.
pub fn decode_html(bytes: &[u8]) -> Cow<'_, str> {
    decode_text(bytes, extract_meta_charset(bytes))
}

/// Extract the charset named by a `<meta>` tag near the start of a document.
///
/// Recognizes both `<meta charset="...">` and the `content="text/html;
/// charset=..."` form. Only the first 1024 bytes are checked.
///
/// # Examples
///
/// ```
/// use turndown::util::extract_meta_charset;
///
/// assert_eq!(extract_meta_charset(b"<meta charset=\"iso-8859-2\">"), Some("iso-8859-2"));
/// assert_eq!(extract_meta_charset(b"<p>none</p>"), None);
/// ```
pub fn extract_meta_charset(bytes: &[u8]) -> Option<&str> {
    let prefix = &bytes[..bytes.len().min(1024)];

    let mut rest = prefix;
    while let Some(meta) = find_ignore_case(rest, b"<meta") {
        let tag = &rest[meta..];
        let end = tag.iter().position(|&b| b == b'>').unwrap_or(tag.len());
        if let Some(charset) = charset_in(&tag[..end]) {
            return Some(charset);
        }
        rest = &tag[end..];
    }
    None
}

fn find_ignore_case(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|w| w.eq_ignore_ascii_case(needle))
}

fn charset_in(tag: &[u8]) -> Option<&str> {
    let pos = find_ignore_case(tag, b"charset=")?;
    let value = &tag[pos + b"charset=".len()..];
    let (value, terminators): (&[u8], &[u8]) = match value.first() {
        Some(b'"') => (&value[1..], &b"\""[..]),
        Some(b'\'') => (&value[1..], &b"'"[..]),
        _ => (value, &b" \t\r\n;\"'/>"[..]),
    };
    let end = value
        .iter()
        .position(|b| terminators.contains(b))
        .unwrap_or(value.len());

    std::str::from_utf8(&value[..end])
        .ok()
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_prefers_utf8() {
        let text = "naïve — ok";
        assert_eq!(decode_text(text.as_bytes(), Some("windows-1252")), text);
    }

    #[test]
    fn test_decode_uses_hint_for_invalid_utf8() {
        // 0xB1 is "ą" in ISO-8859-2
        assert_eq!(decode_text(b"\xB1", Some("iso-8859-2")), "ą");
        assert_eq!(decode_text(b"\xB1", Some("not-a-charset")), "±");
    }

    #[test]
    fn test_meta_charset_forms() {
        assert_eq!(
            extract_meta_charset(b"<html><head><META CHARSET=utf-8>"),
            Some("utf-8")
        );
        assert_eq!(
            extract_meta_charset(
                b"<meta name=\"x\"><meta http-equiv=\"Content-Type\" content=\"text/html; charset=koi8-r\">"
            ),
            Some("koi8-r")
        );
        assert_eq!(extract_meta_charset(b"<meta charset=''>"), None);
    }

    #[test]
    fn test_decode_html_reads_its_own_declaration() {
        let mut bytes = b"<meta charset=\"iso-8859-2\"><p>".to_vec();
        bytes.push(0xB1);
        assert!(decode_html(&bytes).ends_with("<p>ą"));
    }
}
