//! The individual text fixes.
//!
//! Two byte-level repairs run inside the encoding-repair search, between the
//! encode and decode of a candidate plan. The rest are pure string
//! transforms: the narrow mojibake repairs the search tries on its own, and
//! the simple cleanups the iterative driver sequences around it.

use std::sync::LazyLock;

use foldhash::{HashMap, HashMapExt};
use regex::bytes::Regex as BytesRegex;
use regex::Regex;

use crate::charclass::find_utf8_runs;
use crate::codecs::Encoding;
use crate::score::is_bad;

/// Sequences that would be valid UTF-8 if a 0xA0 byte had not been turned
/// into a plain space by some well-meaning whitespace cleanup. Only the lead
/// bytes that produce plausible characters before 0xA0 participate.
static ALTERED_UTF8: LazyLock<BytesRegex> = LazyLock::new(|| {
    BytesRegex::new(
        "(?-u)[\\xc2\\xc3\\xc5\\xce\\xd0\\xd9]\\x20\
         |[\\xe2\\xe3]\\x20[\\x80-\\x84\\x86-\\x9f\\xa1-\\xbf]\
         |[\\xe0-\\xe3][\\x80-\\x84\\x86-\\x9f\\xa1-\\xbf]\\x20\
         |\\xf0\\x20[\\x80-\\xbf][\\x80-\\xbf]\
         |\\xf0[\\x80-\\xbf]\\x20[\\x80-\\xbf]\
         |\\xf0[\\x80-\\xbf][\\x80-\\xbf]\\x20",
    )
    .expect("Invalid altered-UTF-8 pattern")
});

/// UTF-8 and CESU-8 sequences in which some continuation bytes were lost.
/// Byte 0x1A stands for a destroyed byte (the sloppy codecs encode U+FFFD
/// that way); an ASCII '?' is accepted in place of it at most once per
/// sequence.
static LOSSY_UTF8: LazyLock<BytesRegex> = LazyLock::new(|| {
    BytesRegex::new(
        "(?-u)[\\xc2-\\xdf]\\x1a\
         |[\\xc2-\\xc3][?]\
         |\\xed[\\xa0-\\xaf][\\x1a?]\\xed[\\xb0-\\xbf][\\x1a?\\x80-\\xbf]\
         |\\xed[\\xa0-\\xaf][\\x1a?\\x80-\\xbf]\\xed[\\xb0-\\xbf][\\x1a?]\
         |[\\xe0-\\xef][\\x1a?][\\x1a\\x80-\\xbf]\
         |[\\xe0-\\xef][\\x1a\\x80-\\xbf][\\x1a?]\
         |[\\xf0-\\xf4][\\x1a?][\\x1a\\x80-\\xbf][\\x1a\\x80-\\xbf]\
         |[\\xf0-\\xf4][\\x1a\\x80-\\xbf][\\x1a?][\\x1a\\x80-\\xbf]\
         |[\\xf0-\\xf4][\\x1a\\x80-\\xbf][\\x1a\\x80-\\xbf][\\x1a?]\
         |\\x1a",
    )
    .expect("Invalid lossy-UTF-8 pattern")
});

/// `C3 20` is almost always the mojibake of `à` followed by a space that
/// swallowed the word's own 0xA0. The exceptions are the Portuguese
/// contractions (`às`, `àquele`, ...) where the `à` really ends the word,
/// and runs of multiple spaces.
fn a_grave_exception(rest: &[u8]) -> bool {
    rest.starts_with(b" ")
        || rest.starts_with(b"quele")
        || rest.starts_with(b"quela")
        || rest.starts_with(b"quilo")
        || rest.starts_with(b"s ")
}

/// Put back 0xA0 bytes that were replaced by plain spaces inside would-be
/// UTF-8 sequences. Runs inside the repair search, on candidate bytes.
pub fn restore_byte_a0(bytes: &[u8]) -> Vec<u8> {
    // First pass: `C3 20` starting a new word keeps its space and gains an
    // 0xA0, so "Ã la" comes back as "à la" rather than "àla".
    let mut worded = Vec::with_capacity(bytes.len() + 4);
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == 0xc3 && bytes.get(i + 1) == Some(&0x20) && !a_grave_exception(&bytes[i + 2..])
        {
            worded.extend_from_slice(&[0xc3, 0xa0, 0x20]);
            i += 2;
        } else {
            worded.push(bytes[i]);
            i += 1;
        }
    }
    // Second pass: spaces inside the remaining altered sequences become 0xA0.
    ALTERED_UTF8
        .replace_all(&worded, |caps: &regex::bytes::Captures| {
            caps[0]
                .iter()
                .map(|&b| if b == 0x20 { 0xa0 } else { b })
                .collect::<Vec<u8>>()
        })
        .into_owned()
}

/// Replace UTF-8-shaped sequences that lost bytes with the encoding of
/// U+FFFD, so the rest of the string can still be decoded. Runs inside the
/// repair search, on candidate bytes from the sloppy codecs.
pub fn replace_lossy_sequences(bytes: &[u8]) -> Vec<u8> {
    LOSSY_UTF8
        .replace_all(bytes, &b"\xef\xbf\xbd"[..])
        .into_owned()
}

fn reencode_utf8_chunk(chunk: &str) -> Option<String> {
    // Windows-1252 covers almost every run; Latin-1 picks up runs whose
    // continuation bytes decoded to bare C1 controls.
    for encoding in [Encoding::SloppyWindows1252, Encoding::Latin1] {
        let Ok(bytes) = encoding.encode(chunk) else {
            continue;
        };
        let decoder = if bytes.contains(&0xed) || bytes.contains(&0xc0) {
            Encoding::Utf8Variants
        } else {
            Encoding::Utf8
        };
        if let Ok(fixed) = decoder.decode(&bytes) {
            return Some(fixed);
        }
    }
    None
}

/// Decode isolated runs of UTF-8 mojibake in place, leaving the rest of the
/// string alone. This handles strings concatenated from different encodings,
/// where no whole-string plan can apply. Runs that are not themselves bad,
/// or that cover the entire string, are left for the main search.
pub fn decode_inconsistent_utf8(text: &str) -> String {
    let runs = find_utf8_runs(text);
    if runs.is_empty() {
        return text.to_owned();
    }
    let mut out = String::with_capacity(text.len());
    let mut pos = 0;
    for run in runs {
        out.push_str(&text[pos..run.start]);
        let chunk = &text[run.clone()];
        if chunk.len() < text.len() && is_bad(chunk) {
            match reencode_utf8_chunk(chunk) {
                Some(fixed) => out.push_str(&fixed),
                None => out.push_str(chunk),
            }
        } else {
            out.push_str(chunk);
        }
        pos = run.end;
    }
    out.push_str(&text[pos..]);
    out
}

/// The Windows-1252 mojibake of the common punctuation in U+2013..U+2026,
/// recognizable by the `â€` prefix. These are safe to decode even without
/// other evidence.
static PARTIAL_1252_PUNCT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("â€[œ\u{9d}˜™“”¦¢]").expect("Invalid partial-punctuation pattern")
});

/// Decode only the unambiguous Windows-1252 punctuation mojibake (smart
/// quotes, dashes, ellipsis, bullet), in place.
pub fn fix_partial_utf8_punct_in_1252(text: &str) -> String {
    PARTIAL_1252_PUNCT
        .replace_all(text, |caps: &regex::Captures| {
            let third = caps[0].chars().nth(2).expect("pattern is three chars");
            let fixed = match third {
                'œ' => '“',
                '\u{9d}' => '”',
                '˜' => '‘',
                '™' => '’',
                '“' => '–',
                '”' => '—',
                '¦' => '…',
                '¢' => '•',
                other => other,
            };
            fixed.to_string()
        })
        .into_owned()
}

/// Reinterpret C1 control characters as their Windows-1252 equivalents,
/// the way web browsers do. Codepoints outside U+0080..U+009F are untouched.
pub fn fix_c1_controls(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{80}'..='\u{9f}' => Encoding::SloppyWindows1252
                .decode_byte(c as u32 as u8)
                .unwrap_or(c),
            _ => c,
        })
        .collect()
}

/// Stitch UTF-16 surrogate pairs back into the codepoints they represent.
///
/// Strings in this crate hold Unicode scalar values, so unpaired surrogates
/// can only arrive as raw UTF-16 code units (text decoded with the obsolete
/// UCS-2 rules, for instance). Unpaired units become U+FFFD.
pub fn fix_surrogates(units: &[u16]) -> String {
    char::decode_utf16(units.iter().copied())
        .map(|r| r.unwrap_or('\u{fffd}'))
        .collect()
}

/// Replace curly quotation marks, and the modifier-letter apostrophe, with
/// their straight ASCII equivalents.
pub fn uncurl_quotes(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{2bc}' | '\u{2018}'..='\u{201b}' => '\'',
            '\u{201c}'..='\u{201f}' => '"',
            _ => c,
        })
        .collect()
}

/// Replace single-codepoint ligatures and digraphs of Latin letters with the
/// letters they contain. Ligatures in other scripts are left alone; so is æ,
/// which is usually intentional.
pub fn fix_latin_ligatures(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            'Ĳ' => out.push_str("IJ"),
            'ĳ' => out.push_str("ij"),
            '\u{149}' => out.push_str("\u{2bc}n"),
            'Ǳ' => out.push_str("DZ"),
            'ǲ' => out.push_str("Dz"),
            'ǳ' => out.push_str("dz"),
            'Ǆ' => out.push_str("DŽ"),
            'ǅ' => out.push_str("Dž"),
            'ǆ' => out.push_str("dž"),
            'Ǉ' => out.push_str("LJ"),
            'ǈ' => out.push_str("Lj"),
            'ǉ' => out.push_str("lj"),
            'Ǌ' => out.push_str("NJ"),
            'ǋ' => out.push_str("Nj"),
            'ǌ' => out.push_str("nj"),
            '\u{fb00}' => out.push_str("ff"),
            '\u{fb01}' => out.push_str("fi"),
            '\u{fb02}' => out.push_str("fl"),
            '\u{fb03}' => out.push_str("ffi"),
            '\u{fb04}' => out.push_str("ffl"),
            '\u{fb05}' => out.push_str("ſt"),
            '\u{fb06}' => out.push_str("st"),
            _ => out.push(c),
        }
    }
    out
}

/// Replace fullwidth forms and halfwidth katakana with their standard-width
/// forms, including the ideographic space U+3000.
pub fn fix_character_width(text: &str) -> String {
    if !text
        .chars()
        .any(|c| c == '\u{3000}' || ('\u{ff01}'..='\u{ffef}').contains(&c))
    {
        return text.to_owned();
    }
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\u{3000}' => out.push(' '),
            '\u{ff01}'..='\u{ffef}' => {
                unicode_normalization::char::decompose_compatible(c, |d| out.push(d));
            }
            _ => out.push(c),
        }
    }
    out
}

/// Convert all line breaks (CRLF, CR, U+2028, U+2029, and the C1 NEL) to
/// `\n`.
pub fn fix_line_breaks(text: &str) -> String {
    text.replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace('\u{2028}', "\n")
        .replace('\u{2029}', "\n")
        .replace('\u{85}', "\n")
}

static ANSI_ESCAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("\u{1b}\\[[0-9;]*[A-Za-z]").expect("Invalid escape pattern"));

/// Strip ANSI terminal escape sequences, such as color codes.
pub fn remove_terminal_escapes(text: &str) -> String {
    ANSI_ESCAPE.replace_all(text, "").into_owned()
}

/// Remove control characters that have no effect on displayed text: ASCII
/// controls that are not whitespace, deprecated Arabic form-shaping
/// controls, interlinear annotations, the object replacement character, and
/// a byte order mark anywhere in the string. C1 controls stay; they are
/// evidence for the encoding repair.
pub fn remove_control_chars(text: &str) -> String {
    text.chars()
        .filter(|c| {
            !matches!(
                c,
                '\0'..='\u{8}'
                    | '\u{b}'
                    | '\u{e}'..='\u{1f}'
                    | '\u{7f}'
                    | '\u{206a}'..='\u{206f}'
                    | '\u{feff}'
                    | '\u{fff9}'..='\u{fffc}'
            )
        })
        .collect()
}

/// Remove a byte order mark that was decoded as if it were content.
pub fn remove_bom(text: &str) -> String {
    text.trim_start_matches('\u{feff}').to_owned()
}

static HTML_ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("&#?[0-9A-Za-z]{1,24};").expect("Invalid entity pattern"));

/// The named character references this crate decodes: the unambiguous,
/// semicolon-terminated names for Latin-1 letters and the common symbols
/// and punctuation. Rarely-intended names are deliberately absent.
static ENTITIES: &[(&str, char)] = &[
    ("amp", '&'),
    ("lt", '<'),
    ("gt", '>'),
    ("quot", '"'),
    ("apos", '\''),
    ("nbsp", '\u{a0}'),
    ("iexcl", '¡'),
    ("cent", '¢'),
    ("pound", '£'),
    ("curren", '¤'),
    ("yen", '¥'),
    ("brvbar", '¦'),
    ("sect", '§'),
    ("uml", '¨'),
    ("copy", '©'),
    ("ordf", 'ª'),
    ("laquo", '«'),
    ("not", '¬'),
    ("shy", '\u{ad}'),
    ("reg", '®'),
    ("macr", '¯'),
    ("deg", '°'),
    ("plusmn", '±'),
    ("sup2", '²'),
    ("sup3", '³'),
    ("acute", '´'),
    ("micro", 'µ'),
    ("para", '¶'),
    ("middot", '·'),
    ("cedil", '¸'),
    ("sup1", '¹'),
    ("ordm", 'º'),
    ("raquo", '»'),
    ("frac14", '¼'),
    ("frac12", '½'),
    ("frac34", '¾'),
    ("iquest", '¿'),
    ("Agrave", 'À'),
    ("Aacute", 'Á'),
    ("Acirc", 'Â'),
    ("Atilde", 'Ã'),
    ("Auml", 'Ä'),
    ("Aring", 'Å'),
    ("AElig", 'Æ'),
    ("Ccedil", 'Ç'),
    ("Egrave", 'È'),
    ("Eacute", 'É'),
    ("Ecirc", 'Ê'),
    ("Euml", 'Ë'),
    ("Igrave", 'Ì'),
    ("Iacute", 'Í'),
    ("Icirc", 'Î'),
    ("Iuml", 'Ï'),
    ("ETH", 'Ð'),
    ("Ntilde", 'Ñ'),
    ("Ograve", 'Ò'),
    ("Oacute", 'Ó'),
    ("Ocirc", 'Ô'),
    ("Otilde", 'Õ'),
    ("Ouml", 'Ö'),
    ("times", '×'),
    ("Oslash", 'Ø'),
    ("Ugrave", 'Ù'),
    ("Uacute", 'Ú'),
    ("Ucirc", 'Û'),
    ("Uuml", 'Ü'),
    ("Yacute", 'Ý'),
    ("THORN", 'Þ'),
    ("szlig", 'ß'),
    ("agrave", 'à'),
    ("aacute", 'á'),
    ("acirc", 'â'),
    ("atilde", 'ã'),
    ("auml", 'ä'),
    ("aring", 'å'),
    ("aelig", 'æ'),
    ("ccedil", 'ç'),
    ("egrave", 'è'),
    ("eacute", 'é'),
    ("ecirc", 'ê'),
    ("euml", 'ë'),
    ("igrave", 'ì'),
    ("iacute", 'í'),
    ("icirc", 'î'),
    ("iuml", 'ï'),
    ("eth", 'ð'),
    ("ntilde", 'ñ'),
    ("ograve", 'ò'),
    ("oacute", 'ó'),
    ("ocirc", 'ô'),
    ("otilde", 'õ'),
    ("ouml", 'ö'),
    ("divide", '÷'),
    ("oslash", 'ø'),
    ("ugrave", 'ù'),
    ("uacute", 'ú'),
    ("ucirc", 'û'),
    ("uuml", 'ü'),
    ("yacute", 'ý'),
    ("thorn", 'þ'),
    ("yuml", 'ÿ'),
    ("OElig", 'Œ'),
    ("oelig", 'œ'),
    ("Scaron", 'Š'),
    ("scaron", 'š'),
    ("Yuml", 'Ÿ'),
    ("fnof", 'ƒ'),
    ("circ", 'ˆ'),
    ("tilde", '˜'),
    ("ndash", '–'),
    ("mdash", '—'),
    ("lsquo", '‘'),
    ("rsquo", '’'),
    ("sbquo", '‚'),
    ("ldquo", '“'),
    ("rdquo", '”'),
    ("bdquo", '„'),
    ("dagger", '†'),
    ("Dagger", '‡'),
    ("bull", '•'),
    ("hellip", '…'),
    ("permil", '‰'),
    ("lsaquo", '‹'),
    ("rsaquo", '›'),
    ("euro", '€'),
    ("trade", '™'),
];

static ENTITY_MAP: LazyLock<HashMap<&'static str, char>> = LazyLock::new(|| {
    let mut map = HashMap::with_capacity(ENTITIES.len());
    for &(name, c) in ENTITIES {
        map.insert(name, c);
    }
    map
});

fn resolve_entity(entity: &str) -> Option<String> {
    let body = &entity[1..entity.len() - 1];
    if let Some(num) = body.strip_prefix('#') {
        let cp = match num.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse::<u32>().ok()?,
        };
        return char::from_u32(cp)
            .filter(|&c| c != '\0')
            .map(String::from);
    }
    if let Some(&c) = ENTITY_MAP.get(body) {
        return Some(c.to_string());
    }
    // A name written in all caps decodes to the uppercase of its character,
    // so a shouting database field like P&EACUTE;REZ still reads back.
    if body.chars().any(|c| c.is_ascii_lowercase()) {
        return None;
    }
    let lower = body.to_ascii_lowercase();
    ENTITY_MAP
        .get(lower.as_str())
        .map(|c| c.to_uppercase().collect())
}

/// Decode HTML character references: the curated named ones, their all-caps
/// variants, and numeric references. References that do not resolve are left
/// exactly as written.
pub fn unescape_html(text: &str) -> String {
    HTML_ENTITY
        .replace_all(text, |caps: &regex::Captures| {
            let entity = &caps[0];
            resolve_entity(entity).unwrap_or_else(|| entity.to_owned())
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restore_byte_a0_in_word() {
        // "voilà" whose 0xA0 became a space
        let bytes = b"voil\xc3 le travail";
        assert_eq!(restore_byte_a0(bytes), b"voil\xc3\xa0 le travail");
    }

    #[test]
    fn test_restore_byte_a0_portuguese_contraction() {
        // "às" keeps the letter attached instead of starting a new word
        let bytes = b"\xc3 s vezes";
        assert_eq!(restore_byte_a0(bytes), b"\xc3\xa0s vezes");
    }

    #[test]
    fn test_restore_byte_a0_three_byte_sequence() {
        // "—" (E2 80 94) whose 0x80 survived but 0xA0-like middle was spaced
        let bytes = b"x\xe2 \x94y";
        assert_eq!(restore_byte_a0(bytes), b"x\xe2\xa0\x94y");
    }

    #[test]
    fn test_restore_byte_a0_leaves_unrelated_spaces() {
        let bytes = b"plain words with spaces";
        assert_eq!(restore_byte_a0(bytes), bytes);
    }

    #[test]
    fn test_replace_lossy_sequences() {
        // "â€\u{fffd}" as sloppy-1252 bytes: E2 80 1A
        assert_eq!(
            replace_lossy_sequences(b"\xe2\x80\x1a end"),
            b"\xef\xbf\xbd end"
        );
        // a bare substitute byte also becomes U+FFFD
        assert_eq!(replace_lossy_sequences(b"a\x1ab"), b"a\xef\xbf\xbdb");
    }

    #[test]
    fn test_decode_inconsistent_utf8_fixes_only_the_run() {
        let text = "correctly decoded — but Ã©tÃ© embedded";
        let fixed = decode_inconsistent_utf8(text);
        assert_eq!(fixed, "correctly decoded — but été embedded");
    }

    #[test]
    fn test_decode_inconsistent_utf8_leaves_good_runs() {
        // "É…" is detector-shaped but not bad, so it must survive
        assert_eq!(decode_inconsistent_utf8("MARQUÉ…"), "MARQUÉ…");
    }

    #[test]
    fn test_fix_partial_punct() {
        assert_eq!(fix_partial_utf8_punct_in_1252("itâ€™s â€œfineâ€\u{9d}"), "it’s “fine”");
        assert_eq!(fix_partial_utf8_punct_in_1252("dashâ€“here"), "dash–here");
        assert_eq!(fix_partial_utf8_punct_in_1252("waitâ€¦"), "wait…");
    }

    #[test]
    fn test_fix_c1_controls() {
        assert_eq!(fix_c1_controls("ellipsis\u{85}"), "ellipsis…");
        assert_eq!(fix_c1_controls("\u{91}quoted\u{92}"), "‘quoted’");
        // the unassigned slots map to themselves
        assert_eq!(fix_c1_controls("\u{81}"), "\u{81}");
    }

    #[test]
    fn test_fix_surrogates() {
        let units: [u16; 2] = [0xd83d, 0xdca9];
        assert_eq!(fix_surrogates(&units), "💩");
        let reversed: [u16; 2] = [0xdca9, 0xd83d];
        assert_eq!(fix_surrogates(&reversed), "\u{fffd}\u{fffd}");
        let mixed: [u16; 4] = [0x68, 0x69, 0xd83d, 0xdc36];
        assert_eq!(fix_surrogates(&mixed), "hi\u{1f436}");
    }

    #[test]
    fn test_uncurl_quotes() {
        assert_eq!(uncurl_quotes("“here’s a test”"), "\"here's a test\"");
        assert_eq!(uncurl_quotes("\u{2bc}n is fine"), "'n is fine");
    }

    #[test]
    fn test_fix_latin_ligatures() {
        assert_eq!(fix_latin_ligatures("ﬂuﬃest"), "fluffiest");
        assert_eq!(fix_latin_ligatures("Ĳsselmeer"), "IJsselmeer");
        assert_eq!(fix_latin_ligatures("æther"), "æther");
    }

    #[test]
    fn test_fix_character_width() {
        assert_eq!(fix_character_width("ＬＯＵＤ　ＮＯＩＳＥＳ"), "LOUD NOISES");
        assert_eq!(fix_character_width("Ｕﾀｰﾝ"), "Uターン");
    }

    #[test]
    fn test_fix_line_breaks() {
        assert_eq!(
            fix_line_breaks("a\r\nb\rc\u{2028}d\u{2029}e\u{85}f"),
            "a\nb\nc\nd\ne\nf"
        );
    }

    #[test]
    fn test_remove_terminal_escapes() {
        assert_eq!(
            remove_terminal_escapes("\u{1b}[36;44mblue\u{1b}[0m"),
            "blue"
        );
    }

    #[test]
    fn test_remove_control_chars() {
        assert_eq!(remove_control_chars("a\u{0}b\u{feff}c\td\ne"), "abc\td\ne");
        // C1 controls are kept for the encoding repair to see
        assert_eq!(remove_control_chars("x\u{85}y"), "x\u{85}y");
    }

    #[test]
    fn test_remove_bom() {
        assert_eq!(remove_bom("\u{feff}text"), "text");
        assert_eq!(remove_bom("text"), "text");
    }

    #[test]
    fn test_unescape_html() {
        assert_eq!(unescape_html("&lt;tag&gt;"), "<tag>");
        assert_eq!(unescape_html("P&eacute;rez"), "Pérez");
        assert_eq!(unescape_html("P&EACUTE;REZ"), "PÉREZ");
        assert_eq!(unescape_html("BUNDESSTRA&SZLIG;E"), "BUNDESSTRASSE");
        assert_eq!(unescape_html("&#x2019;tis &#233;"), "’tis é");
        assert_eq!(unescape_html("&bogus; stays"), "&bogus; stays");
        // no semicolon, no decode
        assert_eq!(unescape_html("this&not that"), "this&not that");
    }
}
