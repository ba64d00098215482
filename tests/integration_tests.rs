//! End-to-end tests for textmend

use textmend::{
    apply_plan, badness, fix_and_explain, fix_encoding, fix_encoding_and_explain, fix_text,
    ByteFix, Encoding, Step, TextFixerConfig,
};

fn config() -> TextFixerConfig {
    TextFixerConfig::new()
}

/// The mojibake repairs that must succeed, as (broken, fixed) pairs.
const POSITIVE_CASES: &[(&str, &str)] = &[
    ("schÃ¶n", "schön"),
    ("aoÃ»t", "août"),
    ("Ãºnico", "único"),
    ("sÃ³", "só"),
    ("(à¸‡'âŒ£')à¸‡", "(ง'⌣')ง"),
    ("Ã\u{a0} perturber la rÃ©flexion", "à perturber la réflexion"),
    ("voilÃ le travail", "voilà le travail"),
    ("â€œmismatched quotesâ€¦â€\u{9d}", "“mismatched quotes…”"),
    ("â€œlossy decodingâ€\u{fffd}", "“lossy decoding\u{fffd}"),
    ("Ð²Ð¾Ð¿Ñ€Ð¾Ñ\u{81}", "вопрос"),
    ("ÎºÎ±Î»Î·Î¼Î\u{ad}Ï\u{81}Î±", "καλημέρα"),
];

/// Strings that look tempting but must come back byte-for-byte unchanged,
/// with an empty plan.
const NEGATIVE_CASES: &[&str] = &[
    "",
    "plain ASCII text, nothing to do",
    "naïve déjà vu — résumé",
    "IL Y MARQUÉ…",
    "├┤a┼┐a┼┐a┼┐a┼┐a",
    "Ó…",
    "日本語のテキスト",
    "привет мир",
    "καλημέρα κόσμε",
    "(Ò_Ó)",
    "100 € is ≈ £85",
];

#[test]
fn test_positive_scenarios() {
    for &(broken, fixed) in POSITIVE_CASES {
        assert_eq!(fix_encoding(broken, &config()), fixed, "failed on {broken:?}");
    }
}

#[test]
fn test_negative_scenarios_are_untouched() {
    for &text in NEGATIVE_CASES {
        let result = fix_encoding_and_explain(text, &config());
        assert_eq!(result.text, text, "altered {text:?}");
        assert!(result.plan.is_empty(), "non-empty plan for {text:?}");
    }
}

#[test]
fn test_scholarly_umlaut_plan() {
    let result = fix_encoding_and_explain("schÃ¶n", &config());
    assert_eq!(result.text, "schön");
    assert_eq!(
        result.plan,
        vec![
            Step::Encode(Encoding::SloppyWindows1252),
            Step::Decode(Encoding::Utf8),
        ]
    );
}

#[test]
fn test_mona_lisa_unwinds_three_layers() {
    let broken = "The Mona Lisa doesnÃƒÂ¢Ã¢â€šÂ¬Ã¢â€žÂ¢t have eyebrows.";
    assert_eq!(
        fix_encoding(broken, &config()),
        "The Mona Lisa doesn’t have eyebrows."
    );
    // the full driver additionally uncurls the recovered apostrophe
    assert_eq!(
        fix_text(broken, &config()),
        "The Mona Lisa doesn't have eyebrows."
    );
}

#[test]
fn test_byte_a0_restoration_records_its_step() {
    let result = fix_encoding_and_explain("voilÃ le travail", &config());
    assert_eq!(result.text, "voilà le travail");
    assert!(result.plan.contains(&Step::Transcode(ByteFix::RestoreByteA0)));
}

#[test]
fn test_lossy_quarantine_records_its_step() {
    let result = fix_encoding_and_explain("â€œlossy decodingâ€\u{fffd}", &config());
    assert!(result
        .plan
        .contains(&Step::Transcode(ByteFix::ReplaceLossySequences)));
}

// Universal properties

#[test]
fn test_idempotence() {
    let all = POSITIVE_CASES
        .iter()
        .flat_map(|&(broken, fixed)| [broken, fixed])
        .chain(NEGATIVE_CASES.iter().copied());
    for text in all {
        let once = fix_text(text, &config());
        let twice = fix_text(&once, &config());
        assert_eq!(twice, once, "not idempotent on {text:?}");
    }
}

#[test]
fn test_plan_faithfulness() {
    let all = POSITIVE_CASES
        .iter()
        .map(|&(broken, _)| broken)
        .chain(NEGATIVE_CASES.iter().copied());
    for text in all {
        let result = fix_encoding_and_explain(text, &config());
        assert_eq!(
            apply_plan(text, &result.plan),
            result.text,
            "plan does not replay on {text:?}"
        );
    }
}

#[test]
fn test_search_never_raises_badness() {
    for &(broken, _) in POSITIVE_CASES {
        let result = fix_encoding_and_explain(broken, &config());
        assert!(
            badness(&result.text) <= badness(broken),
            "badness rose on {broken:?}"
        );
    }
}

#[test]
fn test_plans_transfer_between_strings() {
    // A plan learned on one string repairs another broken the same way.
    let plan = fix_encoding_and_explain("schÃ¶n", &config()).plan;
    assert_eq!(apply_plan("Ã¼ber schÃ¤rfer", &plan), "über schärfer");
    // ...and degrades gracefully on a string it cannot apply to.
    assert_eq!(apply_plan("日本語", &plan), "日本語");
}

#[test]
fn test_codec_round_trips() {
    for encoding in [
        Encoding::Latin1,
        Encoding::SloppyWindows1250,
        Encoding::SloppyWindows1251,
        Encoding::SloppyWindows1252,
        Encoding::SloppyWindows1253,
        Encoding::SloppyWindows1254,
        Encoding::SloppyWindows1257,
        Encoding::MacRoman,
        Encoding::Cp437,
    ] {
        // every byte decodes, and the decode encodes back to the same bytes
        let bytes: Vec<u8> = (0x20..=0xff).collect();
        let text = encoding.decode(&bytes).unwrap();
        assert_eq!(
            encoding.encode(&text).unwrap(),
            bytes,
            "round trip failed for {encoding}"
        );
    }
}

#[test]
fn test_driver_composes_fixes() {
    // entity decoding exposes mojibake which exposes a curly quote
    let broken = "&acirc;&euro;&oelig;deep&acirc;&euro;&#x9d;";
    assert_eq!(fix_text(broken, &config()), "\"deep\"");
}

#[test]
fn test_segments_are_independent() {
    // one broken line must not drag a correct line into its repair
    let text = "Ã©tÃ©\nvoilà, c'est déjà réparé\n";
    assert_eq!(fix_text(text, &config()), "été\nvoilà, c'est déjà réparé\n");
}

#[test]
fn test_explain_matches_fix_text_on_single_segment() {
    let broken = "doesnâ€™t";
    let explained = fix_and_explain(broken, &config());
    assert_eq!(explained.text, fix_text(broken, &config()));
    assert_eq!(apply_plan(broken, &explained.plan), explained.text);
}
