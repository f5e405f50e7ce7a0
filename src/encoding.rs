// Text encodings: guessing how the input document was saved, decoding it
// strictly through a fallback chain, and encoding the result for saving.

use crate::error::DecodeError;
use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use regex::bytes::Regex;
use std::fmt;
use std::sync::LazyLock;

/// How far into the document to look for a charset declaration.
const SNIFF_LEN: usize = 1024;

static META_CHARSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?\s*([A-Za-z0-9_:.\-]+)"#).unwrap()
});

/// A character encoding used for reading or writing a document.
///
/// `encoding_rs` follows the WHATWG Encoding Standard, where the
/// `iso-8859-1` label means windows-1252. Real ISO-8859-1 (every code
/// point up to U+00FF as one byte, nothing else) is modelled separately.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Charset {
    Whatwg(&'static Encoding),
    Latin1,
}

impl Charset {
    pub fn utf8() -> Charset {
        Charset::Whatwg(UTF_8)
    }

    pub fn windows_1252() -> Charset {
        Charset::Whatwg(WINDOWS_1252)
    }

    pub fn name(self) -> &'static str {
        match self {
            Charset::Whatwg(enc) => enc.name(),
            Charset::Latin1 => "ISO-8859-1",
        }
    }

    /// Decode without replacement characters; `None` on malformed input.
    fn decode_strict(self, bytes: &[u8]) -> Option<String> {
        match self {
            Charset::Whatwg(enc) => enc
                .decode_without_bom_handling_and_without_replacement(bytes)
                .map(|text| text.into_owned()),
            Charset::Latin1 => Some(bytes.iter().map(|&b| char::from(b)).collect()),
        }
    }

    /// Encode without substitutions; `None` when a character has no mapping.
    fn encode_strict(self, text: &str) -> Option<Vec<u8>> {
        match self {
            Charset::Whatwg(enc) => {
                let (bytes, used, had_errors) = enc.encode(text);
                (!had_errors && used == enc).then(|| bytes.into_owned())
            }
            Charset::Latin1 => text
                .chars()
                .map(|c| u8::try_from(u32::from(c)).ok())
                .collect(),
        }
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Decoded document text plus the encoding that worked.
#[derive(Debug)]
pub struct Decoded {
    pub text: String,
    pub encoding: Charset,
}

/// Guess the encoding from a BOM, then a `<meta>` charset declaration,
/// then by statistical detection over the whole document.
pub fn detect(bytes: &[u8]) -> &'static Encoding {
    if let Some((enc, _)) = Encoding::for_bom(bytes) {
        return enc;
    }
    let head = &bytes[..bytes.len().min(SNIFF_LEN)];
    if let Some(enc) = META_CHARSET
        .captures(head)
        .and_then(|c| Encoding::for_label(&c[1]))
    {
        return enc;
    }
    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    detector.guess(None, true)
}

/// Decode with the detected encoding, then windows-1252, utf-8 and
/// iso-8859-1, in that order. The first strict decode that succeeds wins.
pub fn decode(bytes: &[u8]) -> Result<Decoded, DecodeError> {
    let detected = detect(bytes);
    let (body, bom_encoding) = match Encoding::for_bom(bytes) {
        Some((enc, len)) => (&bytes[len..], Some(enc)),
        None => (bytes, None),
    };

    let chain = [
        Charset::Whatwg(detected),
        Charset::windows_1252(),
        Charset::utf8(),
        Charset::Latin1,
    ];
    for charset in chain {
        let input = match charset {
            Charset::Whatwg(enc) if bom_encoding == Some(enc) => body,
            _ => bytes,
        };
        if let Some(text) = charset.decode_strict(input) {
            return Ok(Decoded {
                text,
                encoding: charset,
            });
        }
    }

    Err(DecodeError::Corrupt {
        tried: chain.iter().map(|c| c.name()).collect::<Vec<_>>().join(", "),
    })
}

/// Encoding choices offered when saving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SaveEncoding {
    /// The encoding the document was read with.
    Original,
    #[default]
    #[value(name = "utf-8")]
    Utf8,
    #[value(name = "windows-1252")]
    Windows1252,
    #[value(name = "iso-8859-1")]
    Iso88591,
}

impl SaveEncoding {
    pub const ALL: [SaveEncoding; 4] = [
        SaveEncoding::Original,
        SaveEncoding::Utf8,
        SaveEncoding::Windows1252,
        SaveEncoding::Iso88591,
    ];

    /// Concrete encoding for this choice.
    pub fn resolve(self, original: Charset) -> Charset {
        match self {
            SaveEncoding::Original => original,
            SaveEncoding::Utf8 => Charset::utf8(),
            SaveEncoding::Windows1252 => Charset::windows_1252(),
            SaveEncoding::Iso88591 => Charset::Latin1,
        }
    }
}

impl fmt::Display for SaveEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SaveEncoding::Original => "original",
            SaveEncoding::Utf8 => "utf-8",
            SaveEncoding::Windows1252 => "windows-1252",
            SaveEncoding::Iso88591 => "iso-8859-1",
        };
        f.write_str(name)
    }
}

/// Bytes ready to be written and the encoding they are in.
#[derive(Debug)]
pub struct Encoded {
    pub bytes: Vec<u8>,
    pub encoding: Charset,
    /// True when the requested encoding could not represent the text and
    /// UTF-8 was used instead.
    pub fell_back: bool,
}

/// Encode `text`; unrepresentable characters switch the whole output to UTF-8.
pub fn encode(text: &str, target: Charset) -> Encoded {
    match target.encode_strict(text) {
        Some(bytes) => Encoded {
            bytes,
            encoding: target,
            fell_back: false,
        },
        None => Encoded {
            bytes: text.as_bytes().to_vec(),
            encoding: Charset::utf8(),
            fell_back: true,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_is_detected_and_decoded() {
        let bytes = "<p>árvíztűrő</p>".as_bytes();
        let decoded = decode(bytes).unwrap();
        assert_eq!(decoded.encoding, Charset::utf8());
        assert_eq!(decoded.text, "<p>árvíztűrő</p>");
    }

    #[test]
    fn bom_is_stripped() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(b"<p>x</p>");
        let decoded = decode(&bytes).unwrap();
        assert_eq!(decoded.encoding, Charset::utf8());
        assert_eq!(decoded.text, "<p>x</p>");
    }

    #[test]
    fn legacy_bytes_decode_without_replacement() {
        let decoded = decode(b"<p>caf\xe9</p>").unwrap();
        assert_eq!(decoded.text, "<p>café</p>");
    }

    #[test]
    fn undeclared_central_european_text_is_detected() {
        let text = "<p>Árvíztűrő tükörfúrógép. A hőség miatt a fűtés ki van kapcsolva, \
                    de a kőművesek még dolgoznak a tűző napon. Előre szólunk, hogy a \
                    győri üzletben nyitás előtt összeírjuk a hűtőket és a szőnyegeket.</p>";
        let (bytes, _, had_errors) = encoding_rs::ISO_8859_2.encode(text);
        assert!(!had_errors);

        let decoded = decode(&bytes).unwrap();

        assert_ne!(decoded.encoding, Charset::windows_1252());
        assert_eq!(decoded.text, text);
    }

    #[test]
    fn meta_charset_wins_over_guessing() {
        let bytes = b"<meta charset=\"iso-8859-2\"><p>\xf5</p>";
        let decoded = decode(bytes).unwrap();
        assert_eq!(decoded.encoding.name(), "ISO-8859-2");
        assert_eq!(decoded.text, "<meta charset=\"iso-8859-2\"><p>ő</p>");
    }

    #[test]
    fn declared_utf8_with_bad_bytes_falls_back() {
        let bytes = b"<meta charset=utf-8><p>\xe9</p>";
        let decoded = decode(bytes).unwrap();
        assert_eq!(decoded.encoding, Charset::windows_1252());
    }

    #[test]
    fn encode_falls_back_to_utf8_for_unmappable_text() {
        let encoded = encode("ő", Charset::windows_1252());
        assert!(encoded.fell_back);
        assert_eq!(encoded.encoding, Charset::utf8());
        assert_eq!(encoded.bytes, "ő".as_bytes());

        let encoded = encode("é", Charset::windows_1252());
        assert!(!encoded.fell_back);
        assert_eq!(encoded.bytes, vec![0xE9]);
    }

    #[test]
    fn latin1_is_not_windows_1252() {
        let latin1 = SaveEncoding::Iso88591.resolve(Charset::utf8());
        assert_eq!(latin1.name(), "ISO-8859-1");

        let encoded = encode("price €5", latin1);
        assert!(encoded.fell_back);
        assert_eq!(encoded.encoding, Charset::utf8());
        assert_eq!(encoded.bytes, "price €5".as_bytes());

        let encoded = encode("café ÿ", latin1);
        assert!(!encoded.fell_back);
        assert_eq!(encoded.encoding, Charset::Latin1);
        assert_eq!(encoded.bytes, b"caf\xe9 \xff");

        let encoded = encode("price €5", Charset::windows_1252());
        assert!(!encoded.fell_back);
        assert_eq!(encoded.bytes, b"price \x805");
    }

    #[test]
    fn save_choices_resolve() {
        assert_eq!(SaveEncoding::Utf8.resolve(Charset::windows_1252()), Charset::utf8());
        assert_eq!(
            SaveEncoding::Original.resolve(Charset::windows_1252()),
            Charset::windows_1252()
        );
        assert_eq!(
            SaveEncoding::Windows1252.resolve(Charset::utf8()),
            Charset::windows_1252()
        );
        assert_eq!(SaveEncoding::Iso88591.resolve(Charset::utf8()), Charset::Latin1);
        assert_eq!(SaveEncoding::default(), SaveEncoding::Utf8);
    }
}
