//! Repair plans: the recorded sequence of steps that turned a broken string
//! into a fixed one, re-applicable to other strings.

use std::fmt;

use crate::codecs::Encoding;
use crate::transforms;

/// A byte-level repair that runs between the encode and decode of a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteFix {
    /// Restore 0xA0 bytes that were flattened to spaces.
    RestoreByteA0,
    /// Quarantine UTF-8 sequences that lost bytes into U+FFFD.
    ReplaceLossySequences,
}

impl ByteFix {
    /// The name this fix is recorded under in plans.
    pub fn name(self) -> &'static str {
        match self {
            ByteFix::RestoreByteA0 => "restore_byte_a0",
            ByteFix::ReplaceLossySequences => "replace_lossy_sequences",
        }
    }

    /// Look a byte fix up by its recorded name.
    pub fn from_name(name: &str) -> Option<ByteFix> {
        [ByteFix::RestoreByteA0, ByteFix::ReplaceLossySequences]
            .into_iter()
            .find(|f| f.name() == name)
    }

    pub(crate) fn apply(self, bytes: &[u8]) -> Vec<u8> {
        match self {
            ByteFix::RestoreByteA0 => transforms::restore_byte_a0(bytes),
            ByteFix::ReplaceLossySequences => transforms::replace_lossy_sequences(bytes),
        }
    }
}

/// A string-level transform that can appear in a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextFix {
    UnescapeHtml,
    UncurlQuotes,
    FixLatinLigatures,
    FixCharacterWidth,
    FixLineBreaks,
    /// Surrogate stitching. Strings here always hold scalar values, so this
    /// is the identity at plan level; the UTF-16 entry point
    /// [`transforms::fix_surrogates`] does the real work.
    FixSurrogates,
    RemoveTerminalEscapes,
    RemoveControlChars,
    RemoveBom,
    FixC1Controls,
    DecodeInconsistentUtf8,
    FixPartialUtf8PunctIn1252,
}

impl TextFix {
    /// The name this fix is recorded under in plans.
    pub fn name(self) -> &'static str {
        match self {
            TextFix::UnescapeHtml => "unescape_html",
            TextFix::UncurlQuotes => "uncurl_quotes",
            TextFix::FixLatinLigatures => "fix_latin_ligatures",
            TextFix::FixCharacterWidth => "fix_character_width",
            TextFix::FixLineBreaks => "fix_line_breaks",
            TextFix::FixSurrogates => "fix_surrogates",
            TextFix::RemoveTerminalEscapes => "remove_terminal_escapes",
            TextFix::RemoveControlChars => "remove_control_chars",
            TextFix::RemoveBom => "remove_bom",
            TextFix::FixC1Controls => "fix_c1_controls",
            TextFix::DecodeInconsistentUtf8 => "decode_inconsistent_utf8",
            TextFix::FixPartialUtf8PunctIn1252 => "fix_partial_utf8_punct_in_1252",
        }
    }

    /// Look a text fix up by its recorded name.
    pub fn from_name(name: &str) -> Option<TextFix> {
        [
            TextFix::UnescapeHtml,
            TextFix::UncurlQuotes,
            TextFix::FixLatinLigatures,
            TextFix::FixCharacterWidth,
            TextFix::FixLineBreaks,
            TextFix::FixSurrogates,
            TextFix::RemoveTerminalEscapes,
            TextFix::RemoveControlChars,
            TextFix::RemoveBom,
            TextFix::FixC1Controls,
            TextFix::DecodeInconsistentUtf8,
            TextFix::FixPartialUtf8PunctIn1252,
        ]
        .into_iter()
        .find(|f| f.name() == name)
    }

    pub(crate) fn apply(self, text: &str) -> String {
        match self {
            TextFix::UnescapeHtml => transforms::unescape_html(text),
            TextFix::UncurlQuotes => transforms::uncurl_quotes(text),
            TextFix::FixLatinLigatures => transforms::fix_latin_ligatures(text),
            TextFix::FixCharacterWidth => transforms::fix_character_width(text),
            TextFix::FixLineBreaks => transforms::fix_line_breaks(text),
            TextFix::FixSurrogates => text.to_owned(),
            TextFix::RemoveTerminalEscapes => transforms::remove_terminal_escapes(text),
            TextFix::RemoveControlChars => transforms::remove_control_chars(text),
            TextFix::RemoveBom => transforms::remove_bom(text),
            TextFix::FixC1Controls => transforms::fix_c1_controls(text),
            TextFix::DecodeInconsistentUtf8 => transforms::decode_inconsistent_utf8(text),
            TextFix::FixPartialUtf8PunctIn1252 => {
                transforms::fix_partial_utf8_punct_in_1252(text)
            }
        }
    }
}

/// A Unicode normalization form, applied as a driver step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Normalization {
    Nfc,
    Nfd,
    Nfkc,
    Nfkd,
}

impl Normalization {
    /// The conventional name of the form.
    pub fn name(self) -> &'static str {
        match self {
            Normalization::Nfc => "NFC",
            Normalization::Nfd => "NFD",
            Normalization::Nfkc => "NFKC",
            Normalization::Nfkd => "NFKD",
        }
    }

    pub(crate) fn apply(self, text: &str) -> String {
        use unicode_normalization::UnicodeNormalization;
        match self {
            Normalization::Nfc => text.nfc().collect(),
            Normalization::Nfd => text.nfd().collect(),
            Normalization::Nfkc => text.nfkc().collect(),
            Normalization::Nfkd => text.nfkd().collect(),
        }
    }
}

/// One step of a repair plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Turn the string into bytes with the given encoding.
    Encode(Encoding),
    /// Turn bytes back into a string with the given encoding.
    Decode(Encoding),
    /// Rewrite bytes with a byte-level repair.
    Transcode(ByteFix),
    /// Rewrite the string with a string-level transform.
    Apply(TextFix),
    /// Normalize the string to a Unicode normal form.
    Normalize(Normalization),
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Encode(e) => write!(f, "encode({e})"),
            Step::Decode(e) => write!(f, "decode({e})"),
            Step::Transcode(t) => write!(f, "transcode({})", t.name()),
            Step::Apply(t) => write!(f, "apply({})", t.name()),
            Step::Normalize(n) => write!(f, "normalize({})", n.name()),
        }
    }
}

/// An ordered sequence of steps.
pub type Plan = Vec<Step>;

/// The result of an explaining fixer: the fixed string and the plan that
/// produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplainedText {
    /// The repaired string.
    pub text: String,
    /// The steps that were applied, in order.
    pub plan: Plan,
}

/// The value threaded through a plan: text, or bytes mid-transcoding.
enum Buffer {
    Text(String),
    Bytes(Vec<u8>),
}

/// Re-execute a recorded plan on a string.
///
/// A step that does not apply (a codec failure, or a byte step while the
/// buffer holds text) is skipped and the rest of the plan continues, so a
/// plan recorded on one string degrades gracefully on another. A plan that
/// ends while the buffer still holds bytes is finished with a replacing
/// UTF-8 decode.
pub fn apply_plan(text: &str, plan: &[Step]) -> String {
    let mut buffer = Buffer::Text(text.to_owned());
    for step in plan {
        buffer = match (step, buffer) {
            (Step::Encode(encoding), Buffer::Text(s)) => match encoding.encode(&s) {
                Ok(bytes) => Buffer::Bytes(bytes),
                Err(_) => Buffer::Text(s),
            },
            (Step::Decode(encoding), Buffer::Bytes(b)) => match encoding.decode(&b) {
                Ok(s) => Buffer::Text(s),
                Err(_) => Buffer::Bytes(b),
            },
            (Step::Transcode(fix), Buffer::Bytes(b)) => Buffer::Bytes(fix.apply(&b)),
            (Step::Apply(fix), Buffer::Text(s)) => Buffer::Text(fix.apply(&s)),
            (Step::Normalize(form), Buffer::Text(s)) => Buffer::Text(form.apply(&s)),
            // wrong buffer type for the step: skip it
            (_, buffer) => buffer,
        };
    }
    match buffer {
        Buffer::Text(s) => s,
        Buffer::Bytes(b) => String::from_utf8_lossy(&b).into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_display() {
        assert_eq!(
            Step::Encode(Encoding::SloppyWindows1252).to_string(),
            "encode(sloppy-windows-1252)"
        );
        assert_eq!(Step::Decode(Encoding::Utf8).to_string(), "decode(utf-8)");
        assert_eq!(
            Step::Transcode(ByteFix::RestoreByteA0).to_string(),
            "transcode(restore_byte_a0)"
        );
        assert_eq!(
            Step::Apply(TextFix::FixC1Controls).to_string(),
            "apply(fix_c1_controls)"
        );
    }

    #[test]
    fn test_names_round_trip() {
        for fix in [ByteFix::RestoreByteA0, ByteFix::ReplaceLossySequences] {
            assert_eq!(ByteFix::from_name(fix.name()), Some(fix));
        }
        for fix in [
            TextFix::UnescapeHtml,
            TextFix::FixC1Controls,
            TextFix::DecodeInconsistentUtf8,
        ] {
            assert_eq!(TextFix::from_name(fix.name()), Some(fix));
        }
        assert!(TextFix::from_name("no_such_fix").is_none());
    }

    #[test]
    fn test_apply_plan_runs_encode_decode() {
        let plan = vec![
            Step::Encode(Encoding::SloppyWindows1252),
            Step::Decode(Encoding::Utf8),
        ];
        assert_eq!(apply_plan("schÃ¶n", &plan), "schön");
        // the same plan fixes other strings broken the same way
        assert_eq!(apply_plan("Ã¼ber", &plan), "über");
    }

    #[test]
    fn test_apply_plan_skips_failing_steps() {
        let plan = vec![
            Step::Encode(Encoding::Latin1),
            Step::Decode(Encoding::Utf8),
        ];
        // Not representable in Latin-1: the encode is skipped; the decode
        // then has no bytes to work on and is skipped too.
        assert_eq!(apply_plan("日本語", &plan), "日本語");
    }

    #[test]
    fn test_apply_plan_finishes_dangling_bytes() {
        let plan = vec![Step::Encode(Encoding::SloppyWindows1252)];
        assert_eq!(apply_plan("ascii only", &plan), "ascii only");
    }

    #[test]
    fn test_apply_plan_text_fixes() {
        let plan = vec![
            Step::Apply(TextFix::FixC1Controls),
            Step::Apply(TextFix::UncurlQuotes),
        ];
        assert_eq!(apply_plan("\u{93}quoted\u{94}", &plan), "\"quoted\"");
    }
}
