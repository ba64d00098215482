//! The iterative driver: sequence the encoding repair with the simple text
//! fixes until the string reaches a fixed point.

use crate::config::{TextFixerConfig, UnescapeMode};
use crate::plan::{ExplainedText, Plan, Step, TextFix};
use crate::repair;

/// Apply one text fix if it is enabled, recording a step when it changed
/// something.
fn try_fix(fix: TextFix, enabled: bool, text: String, plan: &mut Plan) -> String {
    if !enabled {
        return text;
    }
    let fixed = fix.apply(&text);
    if fixed != text {
        plan.push(Step::Apply(fix));
    }
    fixed
}

/// Fix `text` as a single segment, returning the result and the plan of
/// every step that changed it.
///
/// Fixes are applied in rounds (entity unescaping, encoding repair, then the
/// character-level cleanups and normalization) until a round changes
/// nothing. Auxiliary fixes can raise the mojibake score, since decoding
/// `&eacute;` may create new mojibake for the next round to repair, so the
/// driver iterates to a fixed point rather than insisting on monotone
/// scores.
pub fn fix_and_explain(text: &str, config: &TextFixerConfig) -> ExplainedText {
    let mut text = text.to_owned();
    let mut plan = Plan::new();

    let unescape = match config.unescape_html {
        UnescapeMode::Always => true,
        UnescapeMode::Never => false,
        UnescapeMode::Auto => !text.contains('<'),
    };

    for _ in 0..config.max_iterations.max(1) {
        let before_round = text.clone();

        text = try_fix(TextFix::UnescapeHtml, unescape, text, &mut plan);

        if config.fix_encoding {
            let repaired = repair::fix_encoding_and_explain(&text, config);
            plan.extend(repaired.plan);
            text = repaired.text;
        }

        text = try_fix(TextFix::FixC1Controls, config.fix_c1_controls, text, &mut plan);
        text = try_fix(
            TextFix::FixLatinLigatures,
            config.fix_latin_ligatures,
            text,
            &mut plan,
        );
        text = try_fix(
            TextFix::FixCharacterWidth,
            config.fix_character_width,
            text,
            &mut plan,
        );
        text = try_fix(TextFix::UncurlQuotes, config.uncurl_quotes, text, &mut plan);
        text = try_fix(TextFix::FixLineBreaks, config.fix_line_breaks, text, &mut plan);
        text = try_fix(
            TextFix::RemoveTerminalEscapes,
            config.remove_terminal_escapes,
            text,
            &mut plan,
        );
        text = try_fix(
            TextFix::RemoveControlChars,
            config.remove_control_chars,
            text,
            &mut plan,
        );

        if let Some(form) = config.normalization {
            let normalized = form.apply(&text);
            if normalized != text {
                plan.push(Step::Normalize(form));
                text = normalized;
            }
        }

        if text == before_round {
            break;
        }
    }

    ExplainedText { text, plan }
}

/// Fix `text`, splitting it at line breaks so unrelated lines cannot
/// influence each other's repairs, and discarding the explanation. Segments
/// are additionally capped at `max_segment_length` codepoints to bound the
/// work on line-break-free input.
pub fn fix_text(text: &str, config: &TextFixerConfig) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pos = 0;
    while pos < text.len() {
        let rest = &text[pos..];
        let mut end = match rest.find('\n') {
            Some(i) => pos + i + 1,
            None => text.len(),
        };
        if end - pos > config.max_segment_length.max(1) {
            end = pos + config.max_segment_length.max(1);
            while !text.is_char_boundary(end) {
                end += 1;
            }
        }
        let segment = &text[pos..end];
        out.push_str(&fix_and_explain(segment, config).text);
        pos = end;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apply_plan;

    fn config() -> TextFixerConfig {
        TextFixerConfig::new()
    }

    #[test]
    fn test_driver_reaches_fixed_point() {
        let result = fix_and_explain("schÃ¶n", &config());
        assert_eq!(result.text, "schön");
        // running the result again changes nothing
        let again = fix_and_explain(&result.text, &config());
        assert_eq!(again.text, result.text);
        assert!(again.plan.is_empty());
    }

    #[test]
    fn test_driver_sequences_entity_and_encoding_fixes() {
        let result = fix_and_explain("&macr;\\_(ã\u{83}\u{84})_/&macr;", &config());
        assert_eq!(result.text, "¯\\_(ツ)_/¯");
    }

    #[test]
    fn test_driver_uncurls_after_repair() {
        let result = fix_and_explain("â€œmismatched quotesâ€¦", &config());
        assert_eq!(result.text, "\"mismatched quotes…");
    }

    #[test]
    fn test_auto_unescape_skips_real_html() {
        let html = "<b>&eacute;</b>";
        assert_eq!(fix_and_explain(html, &config()).text, html);
        let plain = "&eacute;";
        assert_eq!(fix_and_explain(plain, &config()).text, "é");
    }

    #[test]
    fn test_fix_text_segments_by_line() {
        let text = "schÃ¶n\nalready fine\nvoilÃ le travail\n";
        assert_eq!(fix_text(text, &config()), "schön\nalready fine\nvoilà le travail\n");
    }

    #[test]
    fn test_plan_replays_on_driver_output() {
        let broken = "doesnâ€™t";
        let result = fix_and_explain(broken, &config());
        assert_eq!(apply_plan(broken, &result.plan), result.text);
    }

    #[test]
    fn test_width_and_ligature_fixes_run() {
        let result = fix_and_explain("ﬂuﬃest ＬＯＵＤ", &config());
        assert_eq!(result.text, "fluffiest LOUD");
    }
}
