//! The encoding-repair search.
//!
//! The search proposes plans of the form "encode the string as A, decode the
//! bytes as B", in a fixed priority order, along with a few narrow pattern
//! repairs, and accepts a plan only when the badness score strictly drops
//! (or does not rise, for the narrow repairs). Codec failures reject the
//! candidate and the search moves on; it never fails, it just returns the
//! input with an empty plan.

use crate::charclass::{category, contains_mojibake_codepoints, find_utf8_runs, CharClass};
use crate::codecs::Encoding;
use crate::config::TextFixerConfig;
use crate::plan::{ByteFix, ExplainedText, Plan, Step, TextFix};
use crate::score::badness;
use crate::transforms;

/// The single-byte encodings to try re-encoding through, most likely first.
/// Windows-1252 accounts for the overwhelming majority of real mojibake;
/// MacRoman and cp437 produce plausible-looking decodes from innocent text
/// and go last.
const CHARMAP_PRIORITY: [Encoding; 9] = [
    Encoding::SloppyWindows1252,
    Encoding::Latin1,
    Encoding::SloppyWindows1250,
    Encoding::SloppyWindows1251,
    Encoding::SloppyWindows1253,
    Encoding::SloppyWindows1254,
    Encoding::SloppyWindows1257,
    Encoding::MacRoman,
    Encoding::Cp437,
];

/// Repair the encoding of `text` and return both the result and the plan
/// that produced it. The plan can be replayed on other strings with
/// [`apply_plan`](crate::apply_plan).
pub fn fix_encoding_and_explain(text: &str, config: &TextFixerConfig) -> ExplainedText {
    let mut current = text.to_owned();
    let mut plan = Plan::new();
    if !config.fix_encoding {
        return ExplainedText {
            text: current,
            plan,
        };
    }
    for _ in 0..config.max_iterations {
        match fix_one_step(&current, config) {
            Some((fixed, steps)) => {
                plan.extend(steps);
                current = fixed;
            }
            None => break,
        }
    }
    ExplainedText {
        text: current,
        plan,
    }
}

/// Repair the encoding of `text`, discarding the explanation.
pub fn fix_encoding(text: &str, config: &TextFixerConfig) -> String {
    fix_encoding_and_explain(text, config).text
}

/// One step of the search: the highest-priority acceptable candidate, or
/// `None` when the text is as good as it gets.
fn fix_one_step(text: &str, config: &TextFixerConfig) -> Option<(String, Vec<Step>)> {
    if text.is_empty() || text.is_ascii() || !contains_mojibake_codepoints(text) {
        return None;
    }
    let base = badness(text);
    if base == 0 && !has_strong_utf8_clue(text) {
        return None;
    }

    for encoding in CHARMAP_PRIORITY {
        if !encoding.can_encode(text) {
            continue;
        }
        let Ok(mut bytes) = encoding.encode(text) else {
            continue;
        };
        let mut steps = vec![Step::Encode(encoding)];

        // A space may be hiding the 0xA0 a UTF-8 sequence needs. MacRoman is
        // excluded: its en dash encodes to 0xD0, and "– " would match.
        if config.restore_byte_a0 && encoding != Encoding::MacRoman {
            let replaced = transforms::restore_byte_a0(&bytes);
            if replaced != bytes {
                steps.push(Step::Transcode(ByteFix::RestoreByteA0));
                bytes = replaced;
            }
        }
        // Destroyed bytes come back from the sloppy pages as 0x1A; decode
        // the sequences around them as U+FFFD instead of failing.
        if config.replace_lossy_sequences && encoding.is_sloppy() {
            let replaced = transforms::replace_lossy_sequences(&bytes);
            if replaced != bytes {
                steps.push(Step::Transcode(ByteFix::ReplaceLossySequences));
                bytes = replaced;
            }
        }

        // 0xED and 0xC0 never occur in standard UTF-8; their presence means
        // the bytes may be CESU-8 or Java-style.
        let decoder = if bytes.contains(&0xed) || bytes.contains(&0xc0) {
            Encoding::Utf8Variants
        } else {
            Encoding::Utf8
        };
        let Ok(fixed) = decoder.decode(&bytes) else {
            continue;
        };
        if fixed == text {
            continue;
        }
        steps.push(Step::Decode(decoder));

        let has_aux = steps.len() > 2;
        if accept_candidate(text, &fixed, base, has_aux, encoding) {
            return Some((fixed, steps));
        }
    }

    // No whole-string reinterpretation worked; fix isolated runs in place.
    if config.decode_inconsistent_utf8 {
        let fixed = transforms::decode_inconsistent_utf8(text);
        if fixed != text && badness(&fixed) <= base {
            return Some((fixed, vec![Step::Apply(TextFix::DecodeInconsistentUtf8)]));
        }
        let fixed = transforms::fix_partial_utf8_punct_in_1252(text);
        if fixed != text && badness(&fixed) <= base {
            return Some((
                fixed,
                vec![Step::Apply(TextFix::FixPartialUtf8PunctIn1252)],
            ));
        }
    }

    // Text that fits in Latin-1 but carries C1 controls was usually meant to
    // be Windows-1252: the two are constantly confused.
    if Encoding::Latin1.can_encode(text) {
        if let Ok(bytes) = Encoding::Latin1.encode(text) {
            if let Ok(fixed) = Encoding::SloppyWindows1252.decode(&bytes) {
                if fixed != text && badness(&fixed) < base {
                    return Some((
                        fixed,
                        vec![
                            Step::Encode(Encoding::Latin1),
                            Step::Decode(Encoding::SloppyWindows1252),
                        ],
                    ));
                }
            }
        }
    }

    // Last resort for scattered C1 controls in otherwise unfixable text.
    if config.fix_c1_controls && text.chars().any(|c| matches!(c, '\u{80}'..='\u{9f}')) {
        let fixed = transforms::fix_c1_controls(text);
        if fixed != text && badness(&fixed) < base {
            return Some((fixed, vec![Step::Apply(TextFix::FixC1Controls)]));
        }
    }

    None
}

/// Whether the UTF-8 detector found evidence worth acting on even though the
/// pair score is zero. A run of exactly one accented capital plus one
/// non-space mark is the classic false-positive shape (`É…` at the end of
/// French shouting) and does not count.
fn has_strong_utf8_clue(text: &str) -> bool {
    find_utf8_runs(text).iter().any(|run| {
        let chunk = &text[run.clone()];
        let mut chars = chunk.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(first), Some(second), None) => {
                !(category(first) == CharClass::UpperAccented && second != ' ')
            }
            _ => true,
        }
    })
}

/// Decide whether a candidate result is an improvement, applying the
/// scoring rule and the script gates.
fn accept_candidate(
    original: &str,
    candidate: &str,
    base: u32,
    has_aux: bool,
    encoding: Encoding,
) -> bool {
    let new = badness(candidate);
    // MacRoman and cp437 decode too much innocent text plausibly; they have
    // to earn a bigger drop.
    let improved = match encoding {
        Encoding::MacRoman | Encoding::Cp437 => new + 2 <= base,
        _ => new < base,
    };
    if !(improved || (has_aux && new <= base)) {
        return false;
    }

    let count = |s: &str, pred: fn(char) -> bool| s.chars().filter(|&c| pred(c)).count();

    // One new CJK character conjured out of Latin context is noise; real
    // CJK mojibake decodes to at least a couple of them.
    let is_cjk = |c: char| category(c) == CharClass::Cjk;
    let new_cjk = count(candidate, is_cjk).saturating_sub(count(original, is_cjk));
    if new_cjk == 1 {
        return false;
    }

    // A repair that introduces Cyrillic into Latin text must produce a real
    // run of it: two letters minimum, and nothing Latin left in the span it
    // rewrote.
    let is_cyrillic = |c: char| matches!(c, '\u{400}'..='\u{4ff}');
    let new_cyrillic = count(candidate, is_cyrillic).saturating_sub(count(original, is_cyrillic));
    if new_cyrillic > 0 && original.chars().any(|c| c.is_ascii_alphabetic()) {
        let changed = changed_span(original, candidate);
        if new_cyrillic < 2 || changed.chars().any(|c| c.is_ascii_alphabetic()) {
            return false;
        }
    }

    true
}

/// The middle of `candidate` that differs from `original`, found by
/// trimming the longest common prefix and suffix (clipped to char
/// boundaries).
fn changed_span<'a>(original: &str, candidate: &'a str) -> &'a str {
    let mut prefix = original
        .as_bytes()
        .iter()
        .zip(candidate.as_bytes())
        .take_while(|(a, b)| a == b)
        .count();
    while !(original.is_char_boundary(prefix) && candidate.is_char_boundary(prefix)) {
        prefix -= 1;
    }
    let orig_rest = &original[prefix..];
    let cand_rest = &candidate[prefix..];
    let mut suffix = orig_rest
        .as_bytes()
        .iter()
        .rev()
        .zip(cand_rest.as_bytes().iter().rev())
        .take_while(|(a, b)| a == b)
        .count();
    while !(orig_rest.is_char_boundary(orig_rest.len() - suffix)
        && cand_rest.is_char_boundary(cand_rest.len() - suffix))
    {
        suffix -= 1;
    }
    &cand_rest[..cand_rest.len() - suffix]
}
