//! String encodings recognised when parsing an MBE container.
//!
//! Real-world MBE files are overwhelmingly UTF-8, but files produced by
//! older Windows tooling have been seen carrying 8-bit text. There is no
//! in-band signal, so the encoding is a parse-time option; picking the
//! wrong one produces mojibake, not an error. The generator always
//! encodes UTF-8.

use std::str::FromStr;

/// Encoding used to decode sheet names and pool strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextEncoding {
    /// UTF-8 (the default, and the only encoding ever written).
    #[default]
    Utf8,
    /// Raw 8-bit: each byte maps to U+0000..U+00FF. Never fails, which
    /// makes it the fallback when the configured decoder rejects input.
    Latin1,
    /// Windows-1252 (Western European legacy tooling).
    Windows1252,
}

impl TextEncoding {
    /// Decode `bytes`, returning `None` if the decoder rejected them.
    ///
    /// UTF-8 and windows-1252 go through `encoding_rs`; latin1 is the one
    /// 1:1 byte mapping `encoding_rs` does not expose (its "latin1" label
    /// aliases windows-1252 per the WHATWG registry) and is decoded
    /// directly.
    pub(crate) fn decode(self, bytes: &[u8]) -> Option<String> {
        match self {
            Self::Utf8 => {
                let (text, had_errors) = encoding_rs::UTF_8.decode_without_bom_handling(bytes);
                (!had_errors).then(|| text.into_owned())
            }
            Self::Windows1252 => {
                let (text, had_errors) =
                    encoding_rs::WINDOWS_1252.decode_without_bom_handling(bytes);
                (!had_errors).then(|| text.into_owned())
            }
            Self::Latin1 => Some(bytes.iter().map(|&b| char::from(b)).collect()),
        }
    }

    /// The canonical label, as accepted by [`FromStr`].
    pub fn label(self) -> &'static str {
        match self {
            Self::Utf8 => "utf-8",
            Self::Latin1 => "latin1",
            Self::Windows1252 => "windows-1252",
        }
    }
}

/// Error returned when an encoding label is not recognised.
#[derive(Debug, thiserror::Error)]
#[error("unrecognized encoding {0:?} (expected utf-8, latin1, or windows-1252)")]
pub struct UnknownEncoding(String);

impl FromStr for TextEncoding {
    type Err = UnknownEncoding;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => Ok(Self::Utf8),
            "latin1" | "latin-1" | "iso-8859-1" => Ok(Self::Latin1),
            "windows-1252" | "cp1252" => Ok(Self::Windows1252),
            _ => Err(UnknownEncoding(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_accepts_valid() {
        assert_eq!(TextEncoding::Utf8.decode("héllo".as_bytes()).as_deref(), Some("héllo"));
    }

    #[test]
    fn utf8_rejects_invalid() {
        assert_eq!(TextEncoding::Utf8.decode(&[0xE9]), None);
    }

    #[test]
    fn latin1_never_fails() {
        assert_eq!(TextEncoding::Latin1.decode(&[0xE9]).as_deref(), Some("é"));
        assert_eq!(TextEncoding::Latin1.decode(&[]).as_deref(), Some(""));
    }

    #[test]
    fn windows_1252_high_bytes() {
        // 0x80 is the euro sign in cp1252, unlike latin1's U+0080.
        assert_eq!(TextEncoding::Windows1252.decode(&[0x80]).as_deref(), Some("€"));
        assert_eq!(TextEncoding::Latin1.decode(&[0x80]).as_deref(), Some("\u{80}"));
    }

    #[test]
    fn labels_round_trip() {
        for enc in [
            TextEncoding::Utf8,
            TextEncoding::Latin1,
            TextEncoding::Windows1252,
        ] {
            assert_eq!(enc.label().parse::<TextEncoding>().unwrap(), enc);
        }
    }

    #[test]
    fn aliases_accepted() {
        assert_eq!("UTF8".parse::<TextEncoding>().unwrap(), TextEncoding::Utf8);
        assert_eq!("cp1252".parse::<TextEncoding>().unwrap(), TextEncoding::Windows1252);
        assert_eq!("ISO-8859-1".parse::<TextEncoding>().unwrap(), TextEncoding::Latin1);
    }

    #[test]
    fn unknown_label_rejected() {
        assert!("shift-jis".parse::<TextEncoding>().is_err());
    }
}
