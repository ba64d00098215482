//! Character classes and clue tables for mojibake detection.
//!
//! Only a few hundred codepoints ever occur in UTF-8 mojibake: the ones that
//! the supported single-byte codepages produce when fed UTF-8 bytes. This
//! module partitions those codepoints into classes that the badness heuristic
//! scores pairwise, exposes the set of codepoints that can appear in mojibake
//! at all (the cheap early-exit test), and provides the clue tables behind
//! the UTF-8 detector: the codepoints that a Latin-1-like codepage produces
//! from UTF-8 lead and continuation bytes.

use std::ops::Range;
use std::sync::LazyLock;

use foldhash::{HashSet, HashSetExt};

use crate::codecs::CHARMAP_ENCODINGS;

/// The class of a codepoint, as seen by the badness heuristic.
///
/// ASCII and characters outside the mojibake repertoire land in the neutral
/// classes; the remaining classes mirror how each codepoint behaves in real
/// mojibake corpora. A codepoint belongs to exactly one class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharClass {
    /// Unaccented Latin letter, a-z A-Z.
    AsciiLetter,
    /// ASCII digit.
    AsciiDigit,
    /// The ordinary space, U+0020. Neutral in every pair.
    Space,
    /// Printable ASCII that is not a letter, digit or space.
    AsciiOther,
    /// Whitespace other than the ordinary space (tab, newline, U+2028...).
    Whitespace,
    /// ASCII control characters that are not whitespace, plus U+007F.
    Control,
    /// C1 controls, U+0080..U+009F. Each one is a penalty on its own.
    C1Control,
    /// Characters that appear in many contexts, mojibake or not: NBSP, soft
    /// hyphen, middle dot, acute accent, dashes, ellipsis, right single quote.
    Common,
    /// Characters that essentially only occur in mojibake (broken bar,
    /// spacing diacritics, daggers, per-mille, U+FFFD, ...).
    Bad,
    /// Pilcrow and section sign.
    Law,
    /// Currency symbols that appear in the codepage high halves.
    Currency,
    /// Opening punctuation and marks that start a quotation.
    StartPunct,
    /// Closing punctuation and trailing marks.
    EndPunct,
    /// Superscripts, fractions, math operators, numero sign.
    Numeric,
    /// Letters and signs that are used to draw emoticon faces. Penalizing
    /// these would break kaomoji, so they are kept apart from the accented
    /// letter classes.
    Kaomoji,
    /// Accented Latin capitals (minus the kaomoji set).
    UpperAccented,
    /// Accented Latin lowercase letters (minus the kaomoji set).
    LowerAccented,
    /// Greek and Cyrillic capitals, and thorn: letters that lead whole
    /// mis-decoded alphabets but are common at word boundaries.
    UpperCommon,
    /// Greek and Cyrillic lowercase letters.
    LowerCommon,
    /// Box drawing and block elements (minus the plain horizontal line).
    Box,
    /// CJK ideographs, Hangul syllables and kana.
    Cjk,
    /// Combining marks.
    CombiningMark,
    /// Letters of any other script.
    OtherLetter,
    /// Everything else.
    Other,
}

/// Characters that appear in many contexts; sequences containing them are
/// not inherently mojibake.
const COMMON: &str = "\u{a0}\u{ad}\u{b4}\u{b7}\u{2013}\u{2014}\u{2015}\u{2019}\u{2026}";

/// Characters that are nearly always mojibake when they appear at all.
const BAD: &str = "\u{a4}\u{a6}\u{a8}\u{aa}\u{ac}\u{af}\u{b8}\u{ba}\
                   \u{192}\u{2c6}\u{2c7}\u{2d8}\u{2db}\u{2dc}\
                   \u{2020}\u{2021}\u{2030}\u{2310}\u{25ca}\u{fffd}";

const CURRENCY: &str = "\u{a2}\u{a3}\u{a5}\u{20a7}\u{20ac}";

const START_PUNCT: &str = "\u{a1}\u{a9}\u{ab}\u{bf}\u{384}\u{385}\
                           \u{2018}\u{201a}\u{201c}\u{201e}\u{2022}\u{2039}\u{f8ff}";

const END_PUNCT: &str = "\u{ae}\u{bb}\u{2dd}\u{201d}\u{203a}\u{2122}";

const NUMERIC: &str = "\u{b1}\u{b2}\u{b3}\u{b5}\u{b9}\u{bc}\u{bd}\u{be}\u{d7}\u{f7}\
                       \u{2044}\u{2116}\u{2202}\u{2206}\u{220f}\u{2211}\u{221a}\u{221e}\
                       \u{2229}\u{222b}\u{2248}\u{2260}\u{2261}\u{2264}\u{2265}";

/// O- and U-like letters plus the degree sign: the raw material of emoticon
/// faces. Ü and ü are deliberately not here; they are too valuable as
/// mojibake evidence.
const KAOMOJI: &str = "ÒÓÔÕÖÙÚÛòóôõöøùúû\u{150}\u{14c}\u{16a}\u{172}\u{b0}";

const UPPER_ACCENTED_EXTRA: &str = "ĀĂĆČĎĐĒĖĘĚĞĢĪİĶĹĻŁŃŅŇŒŘŚŞŠŢŤŮŰŸŹŻŽҐ";

const LOWER_ACCENTED_EXTRA: &str = "āăąćčďđēėęěğģīįķĺļłńņňŕśşšťźżžґ\u{fb01}\u{fb02}";

/// Classify one codepoint. Pure; the tables above are the data.
pub fn category(c: char) -> CharClass {
    use CharClass::*;
    match c {
        'a'..='z' | 'A'..='Z' => AsciiLetter,
        '0'..='9' => AsciiDigit,
        ' ' => Space,
        '\t' | '\n' | '\r' | '\x0c' => Whitespace,
        '\0'..='\x1f' | '\x7f' => Control,
        '!'..='~' => AsciiOther,
        '\u{80}'..='\u{9f}' => C1Control,
        _ if COMMON.contains(c) => Common,
        _ if BAD.contains(c) => Bad,
        '\u{a7}' | '\u{b6}' => Law,
        _ if CURRENCY.contains(c) => Currency,
        _ if START_PUNCT.contains(c) => StartPunct,
        _ if END_PUNCT.contains(c) => EndPunct,
        _ if NUMERIC.contains(c) => Numeric,
        _ if KAOMOJI.contains(c) => Kaomoji,
        '\u{c0}'..='\u{d1}' | 'Ø' | 'Ü' | 'Ý' => UpperAccented,
        'ß' | '\u{e0}'..='\u{f1}' | 'ü' => LowerAccented,
        _ if UPPER_ACCENTED_EXTRA.contains(c) => UpperAccented,
        _ if LOWER_ACCENTED_EXTRA.contains(c) => LowerAccented,
        'Þ' | '\u{391}'..='\u{3ab}' | '\u{386}' | '\u{388}'..='\u{38f}'
        | '\u{401}'..='\u{42f}' => UpperCommon,
        '\u{3ac}'..='\u{3c9}' | '\u{430}'..='\u{45f}' => LowerCommon,
        '│' | '┌' | '┐' | '┘' | '├' | '┤' | '┬' | '┼'
        | '\u{2550}'..='\u{256c}'
        | '▀' | '▄' | '█' | '▌' | '▐' | '░' | '▒' | '▓' => Box,
        '\u{3040}'..='\u{30ff}'
        | '\u{3400}'..='\u{4dbf}'
        | '\u{4e00}'..='\u{9fff}'
        | '\u{ac00}'..='\u{d7a3}'
        | '\u{f900}'..='\u{faff}'
        | '\u{20000}'..='\u{2ffff}' => Cjk,
        '\u{300}'..='\u{36f}' | '\u{1ab0}'..='\u{1aff}' | '\u{20d0}'..='\u{20ff}' => {
            CombiningMark
        }
        _ if c.is_whitespace() => Whitespace,
        _ if c.is_alphabetic() => OtherLetter,
        _ => Other,
    }
}

/// The set of codepoints that can appear in UTF-8 mojibake at all: the union
/// of the high-half decode images of every supported single-byte encoding,
/// plus U+FFFD. If a string contains none of these, no repair plan can
/// change it and the search exits immediately.
static MOJIBAKE_CODEPOINTS: LazyLock<HashSet<char>> = LazyLock::new(|| {
    let mut set = HashSet::new();
    for encoding in CHARMAP_ENCODINGS {
        for byte in 0x80..=0xff_u8 {
            if let Some(c) = encoding.decode_byte(byte) {
                set.insert(c);
            }
        }
    }
    set.insert('\u{fffd}');
    set
});

/// Whether `c` belongs to the mojibake codepoints set.
pub fn is_mojibake_codepoint(c: char) -> bool {
    !c.is_ascii() && MOJIBAKE_CODEPOINTS.contains(&c)
}

/// Whether any codepoint of `text` belongs to the mojibake codepoints set.
pub fn contains_mojibake_codepoints(text: &str) -> bool {
    text.chars().any(is_mojibake_codepoint)
}

// What follows are the clue tables for the UTF-8 detector: the codepoints
// that the supported codepages produce when they decode UTF-8 lead bytes
// (0xC2-0xDF, 0xE0-0xEF, 0xF0/0xF3) and continuation bytes (0x80-0xBF).
// Each entry is the decode of one such byte in one codepage.

/// Decodes of UTF-8 lead bytes 0xC2..0xDF.
const UTF8_FIRST_OF_2: &str = "ÂÃÄÅÆÇÈÉÊËÌÍÎÏÐÑÒÓÔÕÖ×ØÙÚÛÜÝÞß\
                               ĀĂĆČĎĐĒĖĘĚĞĢĪİĶĹĻŁŃŅŇŌŐŘŚŞŠŢŪŰŮŲŹŻŽ\
                               ΒΓΔΕΖΗΘΙΚΛΜΝΞΟΠΡΣΤΥΦΧΨΩΪΫάέήί\
                               ВГДЕЖЗИЙКЛМНОПРСТУФХЦЧШЩЪЫЬЭЮЯ";

/// Decodes of UTF-8 lead bytes 0xE0..0xEF.
const UTF8_FIRST_OF_3: &str = "àáâãäåæçèéêëìíîï\
                               āăąćčďēėęěģīįķĺļŕź\
                               ΰαβγδεζηθικλμνξο\
                               абвгдежзийклмноп";

/// Decodes of UTF-8 lead bytes 0xF0 and 0xF3; other four-byte leads only
/// produce unassigned codepoints in these codepages.
const UTF8_FIRST_OF_4: &str = "ðđğóšπσру";

/// Decodes of UTF-8 continuation bytes that fall outside U+0080..U+00BF,
/// and that do not usually stand for themselves next to mojibake.
const UTF8_CONTINUATION_EXTRA: &str = "ÆæØø\
                                       ĄąĽľŁłŒœŖŗŚśŞşŠšŤťŸŹźŻżŽž\u{192}\
                                       \u{2c6}\u{2c7}\u{2d8}\u{2db}\u{2dc}\u{2dd}\
                                       \u{384}\u{385}ΆΈΉΊΌΎΏ\
                                       ЁЂЃЄЅІЇЈЉЊЋЌЎЏёђѓєѕіїјљњћќўџҐґ\
                                       †‡‰‹›€№™";

/// Continuation decodes that can also stand for themselves: spaces (a space
/// may have been a converted NBSP), dashes, quotation marks, bullet and
/// ellipsis. These count as continuations but do not block a match that
/// starts right after them.
const UTF8_CONTINUATION_LOOSE: &str = "–—―‘’‚“”„•…";

fn is_utf8_first_of_2(c: char) -> bool {
    UTF8_FIRST_OF_2.contains(c)
}

fn is_utf8_first_of_3(c: char) -> bool {
    UTF8_FIRST_OF_3.contains(c)
}

fn is_utf8_first_of_4(c: char) -> bool {
    UTF8_FIRST_OF_4.contains(c)
}

/// Whether `c` could be the decode of a UTF-8 continuation byte, counting a
/// plain space as a possibly-converted NBSP.
fn is_utf8_continuation(c: char) -> bool {
    c == ' ' || is_utf8_continuation_strict(c) || UTF8_CONTINUATION_LOOSE.contains(c)
}

/// The strict continuation set: excludes the characters that commonly stand
/// for themselves. A detector run must not start right after one of these,
/// or we would fix a few characters in the middle of a larger garble and
/// make it worse.
pub(crate) fn is_utf8_continuation_strict(c: char) -> bool {
    matches!(c, '\u{80}'..='\u{bf}') || UTF8_CONTINUATION_EXTRA.contains(c)
}

/// A maximal run of UTF-8-shaped mojibake found by [`find_utf8_runs`],
/// as a byte range into the scanned string.
pub type Utf8Run = Range<usize>;

/// Find maximal runs of codepoint sequences shaped like mis-decoded UTF-8:
/// one or more groups of a lead-byte decode followed by the right number of
/// continuation-byte decodes. Runs that begin immediately after a strict
/// continuation character are suppressed.
///
/// This is a hand-written linear scan. The equivalent regular expression
/// needs a lookbehind and very large character classes; walking the
/// codepoints directly is both simpler and immune to pathological inputs.
pub fn find_utf8_runs(text: &str) -> Vec<Utf8Run> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let n = chars.len();
    let cont = |i: usize| i < n && is_utf8_continuation(chars[i].1);

    let mut runs = Vec::new();
    let mut i = 0;
    while i < n {
        let start = i;
        let mut j = i;
        loop {
            let step = if j >= n {
                0
            } else if is_utf8_first_of_2(chars[j].1) && cont(j + 1) {
                2
            } else if is_utf8_first_of_3(chars[j].1) && cont(j + 1) && cont(j + 2) {
                3
            } else if is_utf8_first_of_4(chars[j].1) && cont(j + 1) && cont(j + 2) && cont(j + 3)
            {
                4
            } else {
                0
            };
            if step == 0 {
                break;
            }
            j += step;
        }
        if j > start {
            let preceded_ok = start == 0 || !is_utf8_continuation_strict(chars[start - 1].1);
            if preceded_ok {
                let end = if j < n { chars[j].0 } else { text.len() };
                runs.push(chars[start].0..end);
            }
            i = j;
        } else {
            i += 1;
        }
    }
    runs
}
