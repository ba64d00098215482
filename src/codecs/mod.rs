//! The codec registry: every encoding the repair search is allowed to try.
//!
//! The single-byte pages use the static tables in [`tables`]; UTF-8 decoding
//! uses SIMD-accelerated validation, and the CESU-8-tolerant variant lives in
//! [`utf8_variants`]. Encode maps (char to byte) are derived from the decode
//! tables once, on first use.

mod tables;
mod utf8_variants;

use std::fmt;
use std::sync::LazyLock;

use foldhash::{HashMap, HashMapExt};

use crate::error::{DecodeError, EncodeError};
use tables::Charmap;

/// An identifier for one of the encodings the repair search understands.
///
/// "Sloppy" Windows codepages differ from their vendor definitions in one
/// way: the handful of bytes the vendor left unassigned decode to the
/// Latin-1 codepoint with the same number, and those codepoints encode back
/// to the same bytes. Strict codecs refuse such bytes, and a single refused
/// byte would otherwise kill an entire repair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// Standard UTF-8, strict.
    Utf8,
    /// UTF-8 that also accepts CESU-8 surrogate pairs and Java's `C0 80`.
    Utf8Variants,
    /// ISO-8859-1: bytes map to the codepoints with the same numbers.
    Latin1,
    /// Windows-1250 (Central European), sloppy.
    SloppyWindows1250,
    /// Windows-1251 (Cyrillic), sloppy.
    SloppyWindows1251,
    /// Windows-1252 (Western European), sloppy.
    SloppyWindows1252,
    /// Windows-1253 (Greek), sloppy.
    SloppyWindows1253,
    /// Windows-1254 (Turkish), sloppy.
    SloppyWindows1254,
    /// Windows-1257 (Baltic), sloppy.
    SloppyWindows1257,
    /// MacRoman, as used by classic Mac OS and Office for Mac.
    MacRoman,
    /// IBM code page 437, the original DOS character set.
    Cp437,
}

/// The single-byte encodings, in no particular order. Used to build the
/// mojibake codepoint set.
pub(crate) const CHARMAP_ENCODINGS: [Encoding; 9] = [
    Encoding::Latin1,
    Encoding::SloppyWindows1250,
    Encoding::SloppyWindows1251,
    Encoding::SloppyWindows1252,
    Encoding::SloppyWindows1253,
    Encoding::SloppyWindows1254,
    Encoding::SloppyWindows1257,
    Encoding::MacRoman,
    Encoding::Cp437,
];

/// One encode map per table in `TABLES`, built lazily.
static ENCODE_MAPS: LazyLock<Vec<HashMap<char, u8>>> = LazyLock::new(|| {
    TABLES
        .iter()
        .map(|charmap| {
            let mut map = HashMap::with_capacity(128);
            for (i, &c) in charmap.high.iter().enumerate() {
                map.insert(c, 0x80 + i as u8);
            }
            map
        })
        .collect()
});

static TABLES: [&Charmap; 8] = [
    &tables::WINDOWS_1250,
    &tables::WINDOWS_1251,
    &tables::WINDOWS_1252,
    &tables::WINDOWS_1253,
    &tables::WINDOWS_1254,
    &tables::WINDOWS_1257,
    &tables::MACROMAN,
    &tables::CP437,
];

impl Encoding {
    /// The registry name, matching the tags plans are written with.
    pub fn name(self) -> &'static str {
        match self {
            Encoding::Utf8 => "utf-8",
            Encoding::Utf8Variants => "utf-8-variants",
            Encoding::Latin1 => "latin-1",
            Encoding::SloppyWindows1250 => "sloppy-windows-1250",
            Encoding::SloppyWindows1251 => "sloppy-windows-1251",
            Encoding::SloppyWindows1252 => "sloppy-windows-1252",
            Encoding::SloppyWindows1253 => "sloppy-windows-1253",
            Encoding::SloppyWindows1254 => "sloppy-windows-1254",
            Encoding::SloppyWindows1257 => "sloppy-windows-1257",
            Encoding::MacRoman => "macroman",
            Encoding::Cp437 => "cp437",
        }
    }

    /// Look an encoding up by its registry name.
    pub fn from_name(name: &str) -> Option<Encoding> {
        let all = [
            Encoding::Utf8,
            Encoding::Utf8Variants,
            Encoding::Latin1,
            Encoding::SloppyWindows1250,
            Encoding::SloppyWindows1251,
            Encoding::SloppyWindows1252,
            Encoding::SloppyWindows1253,
            Encoding::SloppyWindows1254,
            Encoding::SloppyWindows1257,
            Encoding::MacRoman,
            Encoding::Cp437,
        ];
        all.into_iter().find(|e| e.name() == name)
    }

    /// Whether this is a sloppy codepage (hole-filling, 0x1A for U+FFFD).
    pub(crate) fn is_sloppy(self) -> bool {
        self.charmap().is_some_and(|m| m.sloppy)
    }

    fn charmap_index(self) -> Option<usize> {
        match self {
            Encoding::SloppyWindows1250 => Some(0),
            Encoding::SloppyWindows1251 => Some(1),
            Encoding::SloppyWindows1252 => Some(2),
            Encoding::SloppyWindows1253 => Some(3),
            Encoding::SloppyWindows1254 => Some(4),
            Encoding::SloppyWindows1257 => Some(5),
            Encoding::MacRoman => Some(6),
            Encoding::Cp437 => Some(7),
            _ => None,
        }
    }

    fn charmap(self) -> Option<&'static Charmap> {
        self.charmap_index().map(|i| TABLES[i])
    }

    /// Decode one byte of a single-byte encoding. `None` for the multi-byte
    /// encodings.
    pub(crate) fn decode_byte(self, byte: u8) -> Option<char> {
        if self == Encoding::Latin1 {
            return Some(char::from(byte));
        }
        let charmap = self.charmap()?;
        Some(match byte {
            0x1a if charmap.sloppy => '\u{fffd}',
            0x00..=0x7f => char::from(byte),
            _ => charmap.high[byte as usize - 0x80],
        })
    }

    fn encode_char(self, c: char) -> Option<u8> {
        match self {
            Encoding::Utf8 | Encoding::Utf8Variants => None,
            Encoding::Latin1 => u8::try_from(u32::from(c)).ok(),
            _ => {
                let index = self.charmap_index()?;
                let sloppy = TABLES[index].sloppy;
                if c == '\u{fffd}' && sloppy {
                    Some(0x1a)
                } else if c.is_ascii() {
                    if c == '\u{1a}' && sloppy {
                        None
                    } else {
                        Some(c as u8)
                    }
                } else {
                    ENCODE_MAPS[index].get(&c).copied()
                }
            }
        }
    }

    /// Whether every codepoint of `text` has a byte in this encoding. The
    /// multi-byte encodings can represent anything.
    pub fn can_encode(self, text: &str) -> bool {
        match self {
            Encoding::Utf8 | Encoding::Utf8Variants => true,
            _ => text.chars().all(|c| self.encode_char(c).is_some()),
        }
    }

    /// Encode `text`, strictly. The first unrepresentable character fails
    /// the whole call.
    pub fn encode(self, text: &str) -> Result<Vec<u8>, EncodeError> {
        match self {
            Encoding::Utf8 | Encoding::Utf8Variants => Ok(text.as_bytes().to_vec()),
            _ => {
                let mut out = Vec::with_capacity(text.len());
                for (offset, c) in text.chars().enumerate() {
                    match self.encode_char(c) {
                        Some(b) => out.push(b),
                        None => {
                            return Err(EncodeError {
                                ch: c,
                                offset,
                                encoding: self.name(),
                            })
                        }
                    }
                }
                Ok(out)
            }
        }
    }

    /// Decode `bytes`, strictly. Single-byte pages are total; the UTF-8
    /// decoders reject malformed input, which the repair search treats as
    /// "this candidate does not apply".
    pub fn decode(self, bytes: &[u8]) -> Result<String, DecodeError> {
        match self {
            Encoding::Utf8 => match simdutf8::compat::from_utf8(bytes) {
                Ok(s) => Ok(s.to_owned()),
                Err(e) => {
                    let offset = e.valid_up_to();
                    Err(DecodeError {
                        byte: bytes.get(offset).copied().unwrap_or(0),
                        offset,
                        encoding: self.name(),
                    })
                }
            },
            Encoding::Utf8Variants => utf8_variants::decode(bytes),
            _ => Ok(bytes
                .iter()
                .map(|&b| {
                    self.decode_byte(b)
                        .expect("single-byte decode tables are total")
                })
                .collect()),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
