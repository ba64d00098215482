//! Static decode tables for the single-byte codepages.
//!
//! Each table maps bytes 0x80..=0xFF to the codepoint the page assigns them;
//! bytes below 0x80 are ASCII in every supported page. The sloppy pages fill
//! the slots their vendor mapping leaves unassigned with the Latin-1
//! codepoint of the same value, which is what web browsers and most legacy
//! software do in practice, and what makes encode/decode cycles
//! byte-preserving on real-world data.

/// A single-byte codepage: its registry name, the decode table for the high
/// half, and whether it uses the sloppy conventions (hole-filling, and byte
/// 0x1A standing for U+FFFD so that lossy text can round-trip).
pub(crate) struct Charmap {
    pub name: &'static str,
    pub high: &'static [char; 128],
    pub sloppy: bool,
}

pub(crate) static WINDOWS_1250: Charmap = Charmap {
    name: "sloppy-windows-1250",
    sloppy: true,
    high: &[
        '€', '\u{81}', '‚', '\u{83}', '„', '…', '†', '‡', '\u{88}', '‰', 'Š', '‹', 'Ś', 'Ť',
        'Ž', 'Ź', '\u{90}', '‘', '’', '“', '”', '•', '–', '—', '\u{98}', '™', 'š', '›', 'ś',
        'ť', 'ž', 'ź', '\u{a0}', 'ˇ', '˘', 'Ł', '¤', 'Ą', '¦', '§', '¨', '©', 'Ş', '«', '¬',
        '\u{ad}', '®', 'Ż', '°', '±', '˛', 'ł', '´', 'µ', '¶', '·', '¸', 'ą', 'ş', '»', 'Ľ',
        '˝', 'ľ', 'ż', 'Ŕ', 'Á', 'Â', 'Ă', 'Ä', 'Ĺ', 'Ć', 'Ç', 'Č', 'É', 'Ę', 'Ë', 'Ě', 'Í',
        'Î', 'Ď', 'Đ', 'Ń', 'Ň', 'Ó', 'Ô', 'Ő', 'Ö', '×', 'Ř', 'Ů', 'Ú', 'Ű', 'Ü', 'Ý', 'Ţ',
        'ß', 'ŕ', 'á', 'â', 'ă', 'ä', 'ĺ', 'ć', 'ç', 'č', 'é', 'ę', 'ë', 'ě', 'í', 'î', 'ď',
        'đ', 'ń', 'ň', 'ó', 'ô', 'ő', 'ö', '÷', 'ř', 'ů', 'ú', 'ű', 'ü', 'ý', 'ţ', '˙',
    ],
};

pub(crate) static WINDOWS_1251: Charmap = Charmap {
    name: "sloppy-windows-1251",
    sloppy: true,
    high: &[
        'Ђ', 'Ѓ', '‚', 'ѓ', '„', '…', '†', '‡', '€', '‰', 'Љ', '‹', 'Њ', 'Ќ', 'Ћ', 'Џ', 'ђ',
        '‘', '’', '“', '”', '•', '–', '—', '\u{98}', '™', 'љ', '›', 'њ', 'ќ', 'ћ', 'џ',
        '\u{a0}', 'Ў', 'ў', 'Ј', '¤', 'Ґ', '¦', '§', 'Ё', '©', 'Є', '«', '¬', '\u{ad}', '®',
        'Ї', '°', '±', 'І', 'і', 'ґ', 'µ', '¶', '·', 'ё', '№', 'є', '»', 'ј', 'Ѕ', 'ѕ', 'ї',
        'А', 'Б', 'В', 'Г', 'Д', 'Е', 'Ж', 'З', 'И', 'Й', 'К', 'Л', 'М', 'Н', 'О', 'П', 'Р',
        'С', 'Т', 'У', 'Ф', 'Х', 'Ц', 'Ч', 'Ш', 'Щ', 'Ъ', 'Ы', 'Ь', 'Э', 'Ю', 'Я', 'а', 'б',
        'в', 'г', 'д', 'е', 'ж', 'з', 'и', 'й', 'к', 'л', 'м', 'н', 'о', 'п', 'р', 'с', 'т',
        'у', 'ф', 'х', 'ц', 'ч', 'ш', 'щ', 'ъ', 'ы', 'ь', 'э', 'ю', 'я',
    ],
};

pub(crate) static WINDOWS_1252: Charmap = Charmap {
    name: "sloppy-windows-1252",
    sloppy: true,
    high: &[
        '€', '\u{81}', '‚', 'ƒ', '„', '…', '†', '‡', 'ˆ', '‰', 'Š', '‹', 'Œ', '\u{8d}', 'Ž',
        '\u{8f}', '\u{90}', '‘', '’', '“', '”', '•', '–', '—', '˜', '™', 'š', '›', 'œ',
        '\u{9d}', 'ž', 'Ÿ', '\u{a0}', '¡', '¢', '£', '¤', '¥', '¦', '§', '¨', '©', 'ª', '«',
        '¬', '\u{ad}', '®', '¯', '°', '±', '²', '³', '´', 'µ', '¶', '·', '¸', '¹', 'º', '»',
        '¼', '½', '¾', '¿', 'À', 'Á', 'Â', 'Ã', 'Ä', 'Å', 'Æ', 'Ç', 'È', 'É', 'Ê', 'Ë', 'Ì',
        'Í', 'Î', 'Ï', 'Ð', 'Ñ', 'Ò', 'Ó', 'Ô', 'Õ', 'Ö', '×', 'Ø', 'Ù', 'Ú', 'Û', 'Ü', 'Ý',
        'Þ', 'ß', 'à', 'á', 'â', 'ã', 'ä', 'å', 'æ', 'ç', 'è', 'é', 'ê', 'ë', 'ì', 'í', 'î',
        'ï', 'ð', 'ñ', 'ò', 'ó', 'ô', 'õ', 'ö', '÷', 'ø', 'ù', 'ú', 'û', 'ü', 'ý', 'þ', 'ÿ',
    ],
};

pub(crate) static WINDOWS_1253: Charmap = Charmap {
    name: "sloppy-windows-1253",
    sloppy: true,
    high: &[
        '€', '\u{81}', '‚', 'ƒ', '„', '…', '†', '‡', '\u{88}', '‰', '\u{8a}', '‹', '\u{8c}',
        '\u{8d}', '\u{8e}', '\u{8f}', '\u{90}', '‘', '’', '“', '”', '•', '–', '—', '\u{98}',
        '™', '\u{9a}', '›', '\u{9c}', '\u{9d}', '\u{9e}', '\u{9f}', '\u{a0}', '΅', 'Ά', '£',
        '¤', '¥', '¦', '§', '¨', '©', 'ª', '«', '¬', '\u{ad}', '®', '―', '°', '±', '²', '³',
        '΄', 'µ', '¶', '·', 'Έ', 'Ή', 'Ί', '»', 'Ό', '½', 'Ύ', 'Ώ', 'ΐ', 'Α', 'Β', 'Γ', 'Δ',
        'Ε', 'Ζ', 'Η', 'Θ', 'Ι', 'Κ', 'Λ', 'Μ', 'Ν', 'Ξ', 'Ο', 'Π', 'Ρ', 'Ò', 'Σ', 'Τ', 'Υ',
        'Φ', 'Χ', 'Ψ', 'Ω', 'Ϊ', 'Ϋ', 'ά', 'έ', 'ή', 'ί', 'ΰ', 'α', 'β', 'γ', 'δ', 'ε', 'ζ',
        'η', 'θ', 'ι', 'κ', 'λ', 'μ', 'ν', 'ξ', 'ο', 'π', 'ρ', 'ς', 'σ', 'τ', 'υ', 'φ', 'χ',
        'ψ', 'ω', 'ϊ', 'ϋ', 'ό', 'ύ', 'ώ', 'ÿ',
    ],
};

pub(crate) static WINDOWS_1254: Charmap = Charmap {
    name: "sloppy-windows-1254",
    sloppy: true,
    high: &[
        '€', '\u{81}', '‚', 'ƒ', '„', '…', '†', '‡', 'ˆ', '‰', 'Š', '‹', 'Œ', '\u{8d}',
        '\u{8e}', '\u{8f}', '\u{90}', '‘', '’', '“', '”', '•', '–', '—', '˜', '™', 'š', '›',
        'œ', '\u{9d}', '\u{9e}', 'Ÿ', '\u{a0}', '¡', '¢', '£', '¤', '¥', '¦', '§', '¨', '©',
        'ª', '«', '¬', '\u{ad}', '®', '¯', '°', '±', '²', '³', '´', 'µ', '¶', '·', '¸', '¹',
        'º', '»', '¼', '½', '¾', '¿', 'À', 'Á', 'Â', 'Ã', 'Ä', 'Å', 'Æ', 'Ç', 'È', 'É', 'Ê',
        'Ë', 'Ì', 'Í', 'Î', 'Ï', 'Ğ', 'Ñ', 'Ò', 'Ó', 'Ô', 'Õ', 'Ö', '×', 'Ø', 'Ù', 'Ú', 'Û',
        'Ü', 'İ', 'Ş', 'ß', 'à', 'á', 'â', 'ã', 'ä', 'å', 'æ', 'ç', 'è', 'é', 'ê', 'ë', 'ì',
        'í', 'î', 'ï', 'ğ', 'ñ', 'ò', 'ó', 'ô', 'õ', 'ö', '÷', 'ø', 'ù', 'ú', 'û', 'ü', 'ı',
        'ş', 'ÿ',
    ],
};

pub(crate) static WINDOWS_1257: Charmap = Charmap {
    name: "sloppy-windows-1257",
    sloppy: true,
    high: &[
        '€', '\u{81}', '‚', '\u{83}', '„', '…', '†', '‡', '\u{88}', '‰', '\u{8a}', '‹',
        '\u{8c}', '¨', 'ˇ', '¸', '\u{90}', '‘', '’', '“', '”', '•', '–', '—', '\u{98}', '™',
        '\u{9a}', '›', '\u{9c}', '¯', '˛', '\u{9f}', '\u{a0}', '¡', '¢', '£', '¤', '¥', '¦',
        '§', 'Ø', '©', 'Ŗ', '«', '¬', '\u{ad}', '®', 'Æ', '°', '±', '²', '³', '´', 'µ', '¶',
        '·', 'ø', '¹', 'ŗ', '»', '¼', '½', '¾', 'æ', 'Ą', 'Į', 'Ā', 'Ć', 'Ä', 'Å', 'Ę', 'Ē',
        'Č', 'É', 'Ź', 'Ė', 'Ģ', 'Ķ', 'Ī', 'Ļ', 'Š', 'Ń', 'Ņ', 'Ó', 'Ō', 'Õ', 'Ö', '×', 'Ų',
        'Ł', 'Ś', 'Ū', 'Ü', 'Ż', 'Ž', 'ß', 'ą', 'į', 'ā', 'ć', 'ä', 'å', 'ę', 'ē', 'č', 'é',
        'ź', 'ė', 'ģ', 'ķ', 'ī', 'ļ', 'š', 'ń', 'ņ', 'ó', 'ō', 'õ', 'ö', '÷', 'ų', 'ł', 'ś',
        'ū', 'ü', 'ż', 'ž', '˙',
    ],
};

pub(crate) static MACROMAN: Charmap = Charmap {
    name: "macroman",
    sloppy: false,
    high: &[
        'Ä', 'Å', 'Ç', 'É', 'Ñ', 'Ö', 'Ü', 'á', 'à', 'â', 'ä', 'ã', 'å', 'ç', 'é', 'è', 'ê',
        'ë', 'í', 'ì', 'î', 'ï', 'ñ', 'ó', 'ò', 'ô', 'ö', 'õ', 'ú', 'ù', 'û', 'ü', '†', '°',
        '¢', '£', '§', '•', '¶', 'ß', '®', '©', '™', '´', '¨', '≠', 'Æ', 'Ø', '∞', '±', '≤',
        '≥', '¥', 'µ', '∂', '∑', '∏', 'π', '∫', 'ª', 'º', 'Ω', 'æ', 'ø', '¿', '¡', '¬', '√',
        'ƒ', '≈', '∆', '«', '»', '…', '\u{a0}', 'À', 'Ã', 'Õ', 'Œ', 'œ', '–', '—', '“', '”',
        '‘', '’', '÷', '◊', 'ÿ', 'Ÿ', '⁄', '€', '‹', '›', 'ﬁ', 'ﬂ', '‡', '·', '‚', '„', '‰',
        'Â', 'Ê', 'Á', 'Ë', 'È', 'Í', 'Î', 'Ï', 'Ì', 'Ó', 'Ô', '\u{f8ff}', 'Ò', 'Ú', 'Û',
        'Ù', 'ı', 'ˆ', '˜', '¯', '˘', '˙', '˚', '¸', '˝', '˛', 'ˇ',
    ],
};

pub(crate) static CP437: Charmap = Charmap {
    name: "cp437",
    sloppy: false,
    high: &[
        'Ç', 'ü', 'é', 'â', 'ä', 'à', 'å', 'ç', 'ê', 'ë', 'è', 'ï', 'î', 'ì', 'Ä', 'Å', 'É',
        'æ', 'Æ', 'ô', 'ö', 'ò', 'û', 'ù', 'ÿ', 'Ö', 'Ü', '¢', '£', '¥', '₧', 'ƒ', 'á', 'í',
        'ó', 'ú', 'ñ', 'Ñ', 'ª', 'º', '¿', '⌐', '¬', '½', '¼', '¡', '«', '»', '░', '▒', '▓',
        '│', '┤', '╡', '╢', '╖', '╕', '╣', '║', '╗', '╝', '╜', '╛', '┐', '└', '┴', '┬', '├',
        '─', '┼', '╞', '╟', '╚', '╔', '╩', '╦', '╠', '═', '╬', '╧', '╨', '╤', '╥', '╙', '╘',
        '╒', '╓', '╫', '╪', '┘', '┌', '█', '▄', '▌', '▐', '▀', 'α', 'ß', 'Γ', 'π', 'Σ', 'σ',
        'µ', 'τ', 'Φ', 'Θ', 'Ω', 'δ', '∞', 'φ', 'ε', '∩', '≡', '±', '≥', '≤', '⌠', '⌡', '÷',
        '≈', '°', '∙', '·', '√', 'ⁿ', '²', '■', '\u{a0}',
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_windows_1252_assignments() {
        assert_eq!(WINDOWS_1252.high[0x80 - 0x80], '€');
        assert_eq!(WINDOWS_1252.high[0x93 - 0x80], '“');
        assert_eq!(WINDOWS_1252.high[0xe9 - 0x80], 'é');
        // the five unassigned slots round-trip as Latin-1
        for byte in [0x81u8, 0x8d, 0x8f, 0x90, 0x9d] {
            let expected = char::from_u32(byte as u32).unwrap();
            assert_eq!(WINDOWS_1252.high[byte as usize - 0x80], expected);
        }
    }

    #[test]
    fn test_tables_are_injective() {
        for map in [
            &WINDOWS_1250,
            &WINDOWS_1251,
            &WINDOWS_1252,
            &WINDOWS_1253,
            &WINDOWS_1254,
            &WINDOWS_1257,
            &MACROMAN,
            &CP437,
        ] {
            let mut seen = std::collections::HashSet::new();
            for &c in map.high.iter() {
                assert!(seen.insert(c), "{}: duplicate decode {c:?}", map.name);
                assert!(!c.is_ascii(), "{}: ASCII in high half: {c:?}", map.name);
            }
        }
    }

    #[test]
    fn test_turkish_and_baltic_divergences() {
        assert_eq!(WINDOWS_1254.high[0xd0 - 0x80], 'Ğ');
        assert_eq!(WINDOWS_1254.high[0xfd - 0x80], 'ı');
        assert_eq!(WINDOWS_1257.high[0xd0 - 0x80], 'Š');
        assert_eq!(WINDOWS_1257.high[0xe0 - 0x80], 'ą');
    }

    #[test]
    fn test_box_drawing_lives_in_cp437() {
        assert_eq!(CP437.high[0xc3 - 0x80], '├');
        assert_eq!(CP437.high[0xc5 - 0x80], '┼');
        assert_eq!(CP437.high[0xff - 0x80], '\u{a0}');
    }
}
