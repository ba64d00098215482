//! A decoder for "utf-8-variants": standard UTF-8 plus the two popular
//! deviations produced by UTF-16-based software.
//!
//! CESU-8 encodes an astral codepoint as the two three-byte sequences of its
//! UTF-16 surrogate pair (`ED A0-AF xx ED B0-BF xx`), and Java's modified
//! UTF-8 additionally writes U+0000 as the overlong pair `C0 80`. Both show
//! up constantly in mojibake that passed through Java or old database
//! drivers. This decoder accepts all three dialects interleaved; encoding is
//! not provided because output is always standard UTF-8.
//!
//! Everything else is strict: overlong forms, lone surrogate sequences, and
//! truncated sequences are errors, which the repair search treats as
//! "this candidate was not UTF-8 after all".

use crate::error::DecodeError;

const NAME: &str = "utf-8-variants";

fn bad_byte(bytes: &[u8], offset: usize) -> DecodeError {
    DecodeError {
        byte: bytes.get(offset).copied().unwrap_or(0),
        offset: offset.min(bytes.len().saturating_sub(1)),
        encoding: NAME,
    }
}

/// Decode bytes as UTF-8, CESU-8, or Java modified UTF-8, in any mixture.
pub(crate) fn decode(bytes: &[u8]) -> Result<String, DecodeError> {
    // The common case is plain valid UTF-8; let the SIMD validator prove it.
    if let Ok(s) = simdutf8::basic::from_utf8(bytes) {
        return Ok(s.to_owned());
    }

    let cont = |i: usize| matches!(bytes.get(i), Some(0x80..=0xbf));

    let mut out = String::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        match b {
            0x00..=0x7f => {
                out.push(b as char);
                i += 1;
            }
            0xc0 => {
                // Java writes U+0000 as C0 80; any other use of C0 is overlong.
                if bytes.get(i + 1) == Some(&0x80) {
                    out.push('\u{0}');
                    i += 2;
                } else {
                    return Err(bad_byte(bytes, i));
                }
            }
            0xc2..=0xdf => {
                if !cont(i + 1) {
                    return Err(bad_byte(bytes, i + 1));
                }
                let cp = ((b as u32 & 0x1f) << 6) | (bytes[i + 1] as u32 & 0x3f);
                out.push(char::from_u32(cp).expect("two-byte sequences are always scalar"));
                i += 2;
            }
            0xed if matches!(bytes.get(i + 1), Some(0xa0..=0xaf)) => {
                // A high surrogate: only meaningful as the first half of a
                // CESU-8 pair. Without its partner it is unrepresentable.
                if cont(i + 2)
                    && bytes.get(i + 3) == Some(&0xed)
                    && matches!(bytes.get(i + 4), Some(0xb0..=0xbf))
                    && cont(i + 5)
                {
                    let cp = 0x10000
                        + ((bytes[i + 1] as u32 & 0x0f) << 16)
                        + ((bytes[i + 2] as u32 & 0x3f) << 10)
                        + ((bytes[i + 4] as u32 & 0x0f) << 6)
                        + (bytes[i + 5] as u32 & 0x3f);
                    match char::from_u32(cp) {
                        Some(c) => out.push(c),
                        None => return Err(bad_byte(bytes, i)),
                    }
                    i += 6;
                } else {
                    return Err(bad_byte(bytes, i));
                }
            }
            0xed if matches!(bytes.get(i + 1), Some(0xb0..=0xbf)) => {
                // A lone low surrogate.
                return Err(bad_byte(bytes, i));
            }
            0xe0..=0xef => {
                let second_ok = match b {
                    0xe0 => matches!(bytes.get(i + 1), Some(0xa0..=0xbf)),
                    0xed => matches!(bytes.get(i + 1), Some(0x80..=0x9f)),
                    _ => cont(i + 1),
                };
                if !second_ok {
                    return Err(bad_byte(bytes, i + 1));
                }
                if !cont(i + 2) {
                    return Err(bad_byte(bytes, i + 2));
                }
                let cp = ((b as u32 & 0x0f) << 12)
                    | ((bytes[i + 1] as u32 & 0x3f) << 6)
                    | (bytes[i + 2] as u32 & 0x3f);
                match char::from_u32(cp) {
                    Some(c) => out.push(c),
                    None => return Err(bad_byte(bytes, i)),
                }
                i += 3;
            }
            0xf0..=0xf4 => {
                let second_ok = match b {
                    0xf0 => matches!(bytes.get(i + 1), Some(0x90..=0xbf)),
                    0xf4 => matches!(bytes.get(i + 1), Some(0x80..=0x8f)),
                    _ => cont(i + 1),
                };
                if !second_ok {
                    return Err(bad_byte(bytes, i + 1));
                }
                if !cont(i + 2) {
                    return Err(bad_byte(bytes, i + 2));
                }
                if !cont(i + 3) {
                    return Err(bad_byte(bytes, i + 3));
                }
                let cp = ((b as u32 & 0x07) << 18)
                    | ((bytes[i + 1] as u32 & 0x3f) << 12)
                    | ((bytes[i + 2] as u32 & 0x3f) << 6)
                    | (bytes[i + 3] as u32 & 0x3f);
                match char::from_u32(cp) {
                    Some(c) => out.push(c),
                    None => return Err(bad_byte(bytes, i)),
                }
                i += 4;
            }
            _ => return Err(bad_byte(bytes, i)),
        }
    }
    Ok(out)
}
