//! The badness heuristic: how implausible are the codepoint pairs of a
//! string?
//!
//! Each codepoint is projected through [`category`] and adjacent pairs are
//! scored against a fixed class-pair table, with a second table of known
//! two-character mojibake shapes layered on top. C1 controls are penalties
//! on their own. The result is a non-negative integer; zero means "nothing
//! here looks like mojibake", and the repair search accepts a step only when
//! this score goes down.
//!
//! Keeping the tables to pairs keeps evaluation linear in the input and the
//! data small. A few three-character shapes are kept where the pair alone is
//! common in legitimate text; they are listed in [`trigram_weight`].

use crate::charclass::{category, contains_mojibake_codepoints, CharClass};

/// Weight for a pair of character classes.
///
/// The match arms are the table: each arm is a family of implausible
/// juxtapositions, weighted 1. Pairs not listed are plausible and score 0.
fn class_pair_weight(a: CharClass, b: CharClass) -> u32 {
    use CharClass::*;
    match (a, b) {
        // anything mojibake-flavored next to a nearly-always-mojibake char
        (
            Bad | LowerAccented | UpperAccented | Box | StartPunct | EndPunct | Currency
            | Numeric | Law,
            Bad,
        ) => 1,
        (
            Bad,
            LowerAccented | UpperAccented | Box | StartPunct | EndPunct | Currency | Numeric
            | Law,
        ) => 1,
        // an accented capital in positions accented capitals don't go
        (LowerAccented | LowerCommon | Box | EndPunct | Currency | Numeric, UpperAccented) => 1,
        (Box | EndPunct | Currency | Numeric, LowerAccented) => 1,
        // currency signs right after letters or closing punctuation
        (LowerAccented | Box | EndPunct, Currency) => 1,
        (UpperAccented | Box, Numeric | Law) => 1,
        // opening punctuation immediately after signs and numbers
        (Currency | Numeric | Box, StartPunct) => 1,
        // box-drawing characters embedded in running text
        (Box, Kaomoji | EndPunct) => 1,
        (LowerAccented | UpperAccented | Currency | Numeric | StartPunct | EndPunct | Law, Box) => {
            1
        }
        _ => 0,
    }
}

/// Characters that realistically follow `Â`, `Ã`, `Î` or `Ð` when a UTF-8
/// string has been read as Windows-1252: continuation-byte decodes that are
/// punctuation, currency or the distinctive high-half signs.
fn is_windows1252_follower(c: char) -> bool {
    "€œŠš¢£Ÿž\u{a0}\u{ad}®©°·»–—´".contains(c)
        || matches!(category(c), CharClass::StartPunct | CharClass::EndPunct)
}

/// Known two-character mojibake, scored higher than the class table because
/// the pair alone is near-conclusive.
fn special_pair_weight(a: char, b: char) -> u32 {
    match a {
        'Â' | 'Ã' | 'Î' | 'Ð' if is_windows1252_follower(b) => 2,
        '×' if matches!(b, '²' | '³') => 1,
        // MacRoman mojibake shapes
        '√' if "±∂†≠®™´≤≥¥µø".contains(b) => 1,
        '≈' if matches!(b, '°' | '¢') => 1,
        // Windows-1251 mojibake of the U+2000 range
        'в' if b == 'Ђ' => 2,
        // Windows-1257 mojibake of the U+2000 range
        'ā' if b == '€' => 2,
        // Windows-1252 mojibake that starts three-character South Asian
        // sequences
        'à' if "²µ¹¼½¾".contains(b) => 1,
        // the ligature œ when not followed by an unaccented Latin letter
        'Œ' | 'œ' if !b.is_ascii_alphabetic() => 1,
        _ if b == '°' && category(a) == CharClass::UpperAccented => 1,
        _ => 0,
    }
}

/// Three-character shapes whose two-character prefixes occur in ordinary
/// text: MacRoman curly punctuation, and Windows-1251/1253 mojibake of
/// Latin-1 characters, which needs a letter on both sides to be convincing.
fn trigram_weight(a: char, b: char, c: char) -> u32 {
    let sandwich_class = |m: char| {
        matches!(
            category(m),
            CharClass::C1Control
                | CharClass::Bad
                | CharClass::StartPunct
                | CharClass::EndPunct
                | CharClass::Currency
        ) || m == '°'
            || m == 'µ'
    };
    match (a, b) {
        ('‚', 'Ä') if "ìîïòôúùû†°¢π".contains(c) => 1,
        _ if "ВГРС".contains(a) && sandwich_class(b) && "ВГРС".contains(c) => 1,
        _ if "ΒΓΞΟ".contains(a) && sandwich_class(b) && "ΒΓΞΟ".contains(c) => 1,
        ('β', '€') if "™\u{a0}Ά\u{ad}®°".contains(c) => 1,
        _ => 0,
    }
}

/// Score the implausibility of `text`'s codepoint sequence. Zero means no
/// codepoint pair looks like mojibake.
pub fn badness(text: &str) -> u32 {
    if !contains_mojibake_codepoints(text) {
        return 0;
    }
    let mut score = 0;
    let mut window: [Option<char>; 2] = [None, None];
    for c in text.chars() {
        let class = category(c);
        if class == CharClass::C1Control {
            score += 1;
        }
        if let Some(prev) = window[1] {
            score += special_pair_weight(prev, c).max(class_pair_weight(category(prev), class));
        }
        if let (Some(first), Some(second)) = (window[0], window[1]) {
            score += trigram_weight(first, second, c);
        }
        window = [window[1], Some(c)];
    }
    score
}

/// Whether `text` contains anything that looks like mojibake.
pub fn is_bad(text: &str) -> bool {
    badness(text) > 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text_scores_zero() {
        assert_eq!(badness(""), 0);
        assert_eq!(badness("ordinary English text."), 0);
        assert_eq!(badness("naïve déjà vu — résumé"), 0);
        assert_eq!(badness("Größe straße"), 0);
        assert_eq!(badness("привет мир"), 0);
        assert_eq!(badness("καλημέρα"), 0);
        assert_eq!(badness("日本語のテキスト"), 0);
        assert_eq!(badness("100 € and 50 £"), 0);
    }

    #[test]
    fn test_classic_1252_mojibake_is_bad() {
        assert!(is_bad("schÃ¶n"));
        assert!(is_bad("aoÃ»t"));
        assert!(is_bad("â€œquotedâ€\u{9d}"));
        assert!(is_bad("doesnâ€™t"));
        assert!(is_bad("Ã\u{a0} perturber"));
        assert!(is_bad("sÃ³"));
    }

    #[test]
    fn test_c1_controls_are_penalized() {
        assert!(is_bad("ellipsis\u{85}"));
        assert_eq!(badness("\u{80}\u{81}"), 2);
    }

    #[test]
    fn test_kaomoji_are_not_penalized() {
        assert_eq!(badness("(Ò_Ó)"), 0);
        assert_eq!(badness("(ù_ú)"), 0);
        assert_eq!(badness("¯\\_(ツ)_/¯"), 0);
    }

    #[test]
    fn test_known_false_positives_score_zero() {
        // box drawing next to ASCII letters: cp437 art, not mojibake
        assert_eq!(badness("├┤a┼┐a┼┐a┼┐a┼┐a"), 0);
        // accented capital before ellipsis: ends of French shouting
        assert_eq!(badness("IL Y MARQUÉ…"), 0);
        // an isolated à-word is below the pair threshold on its own
        assert_eq!(badness("voilÃ le travail"), 0);
    }

    #[test]
    fn test_special_pairs() {
        assert!(badness("Ã©") >= 2);
        assert!(badness("Ã»") >= 2);
        assert!(is_bad("×³"));
        assert!(is_bad("√±"));
        assert!(is_bad("вЂ™"));
        assert!(!is_bad("Œuvre"));
        assert!(is_bad("Œ¨"));
    }

    #[test]
    fn test_macroman_trigram() {
        assert!(is_bad("‚Äú"));
        assert!(is_bad("‚Äù"));
        assert_eq!(badness("‚Ähnlich"), 0);
    }

    #[test]
    fn test_repair_lowers_badness() {
        for (broken, fixed) in [
            ("schÃ¶n", "schön"),
            ("aoÃ»t", "août"),
            ("doesnâ€™t", "doesn’t"),
            ("(à¸‡'âŒ£')à¸‡", "(ง'⌣')ง"),
        ] {
            assert!(
                badness(broken) > badness(fixed),
                "{broken:?} should score higher than {fixed:?}"
            );
        }
    }
}
