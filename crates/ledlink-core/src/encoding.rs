use encoding_rs::UTF_8;

/// How inbound device bytes become display text.
///
/// The board's own replies are plain ASCII; `Auto` keeps odd or corrupted
/// chunks readable by falling back to charset detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextEncoding {
    #[default]
    Auto,
    Utf8,
    Ascii,
}

impl std::str::FromStr for TextEncoding {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "UTF-8" => Self::Utf8,
            "ASCII" => Self::Ascii,
            _ => Self::Auto,
        })
    }
}

impl TextEncoding {
    pub fn decode(&self, bytes: &[u8]) -> String {
        match self {
            Self::Auto => detect_and_decode(bytes),
            Self::Utf8 => UTF_8.decode(bytes).0.into_owned(),
            Self::Ascii => bytes
                .iter()
                .map(|&b| if b.is_ascii() { b as char } else { '?' })
                .collect(),
        }
    }
}

fn detect_and_decode(bytes: &[u8]) -> String {
    if bytes.is_empty() {
        return String::new();
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(bytes, true);
    let encoding = detector.guess(None, true);

    encoding.decode(bytes).0.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_passes_valid_utf8_through() {
        assert_eq!(TextEncoding::Auto.decode(b"LED v1.2"), "LED v1.2");
    }

    #[test]
    fn test_auto_on_empty_chunk() {
        assert_eq!(TextEncoding::Auto.decode(b""), "");
    }

    #[test]
    fn test_utf8_replaces_invalid_sequences() {
        let text = TextEncoding::Utf8.decode(&[b'o', b'k', 0xFF]);
        assert!(text.starts_with("ok"));
        assert!(text.contains('\u{FFFD}'));
    }

    #[test]
    fn test_ascii_masks_high_bytes() {
        assert_eq!(TextEncoding::Ascii.decode(&[b'h', b'i', 0xC3]), "hi?");
    }

    #[test]
    fn test_from_str_names() {
        assert_eq!("UTF-8".parse(), Ok(TextEncoding::Utf8));
        assert_eq!("ASCII".parse(), Ok(TextEncoding::Ascii));
        assert_eq!("anything else".parse(), Ok(TextEncoding::Auto));
    }
}
