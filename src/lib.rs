//! textmend: fix Unicode text that was decoded in the wrong encoding.
//!
//! Mojibake is text that was encoded in one character encoding and then
//! decoded as another: "schÃ¶n" where "schön" was meant. The damage is
//! usually reversible. This crate detects it with a quantitative badness
//! heuristic, searches a small space of encode/decode plans plus a few
//! narrow pattern repairs, and applies a plan only when the heuristic says
//! the text got strictly better. It is calibrated to leave already-correct
//! text alone.
//!
//! # Quick Start
//!
//! ```
//! use textmend::{fix_text, TextFixerConfig};
//!
//! let config = TextFixerConfig::new();
//! assert_eq!(fix_text("schÃ¶n", &config), "schön");
//! assert_eq!(fix_text("already fine", &config), "already fine");
//! ```
//!
//! To see how a string was repaired, and to replay the same repair on other
//! strings, use the explaining API:
//!
//! ```
//! use textmend::{apply_plan, fix_encoding_and_explain, TextFixerConfig};
//!
//! let config = TextFixerConfig::new();
//! let result = fix_encoding_and_explain("aoÃ»t", &config);
//! assert_eq!(result.text, "août");
//! assert_eq!(apply_plan("dÃ©jÃ\u{a0}", &result.plan), "déjà");
//! ```
//!
//! # What it does
//!
//! - Re-decodes text mistaken for Latin-1, the sloppy Windows codepages
//!   (1250, 1251, 1252, 1253, 1254, 1257), MacRoman or cp437, when the
//!   original was UTF-8 or a CESU-8-style variant of it.
//! - Repairs narrow patterns around that: surrogate stitching, dropped
//!   non-breaking spaces, mojibake partially destroyed into U+FFFD,
//!   embedded runs of UTF-8 mojibake inside otherwise-correct strings, and
//!   stray C1 controls.
//! - Sequences the simple cleanups a text pipeline wants around encoding
//!   repair: HTML entities, curly quotes, ligatures, character width, line
//!   breaks, terminal escapes, control characters, normalization.
//!
//! Byte-level encoding detection is out of scope: input is already Unicode.

mod charclass;
mod codecs;
mod config;
mod error;
mod fixer;
mod plan;
mod repair;
mod score;
pub mod transforms;

pub use codecs::Encoding;
pub use config::{TextFixerConfig, UnescapeMode};
pub use error::{DecodeError, EncodeError};
pub use fixer::{fix_and_explain, fix_text};
pub use plan::{apply_plan, ByteFix, ExplainedText, Normalization, Plan, Step, TextFix};
pub use repair::{fix_encoding, fix_encoding_and_explain};
pub use score::{badness, is_bad};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_api() {
        let config = TextFixerConfig::new();
        let _ = fix_text("x", &config);
        let _ = fix_and_explain("x", &config);
        let _ = fix_encoding("x", &config);
        let _ = fix_encoding_and_explain("x", &config);
        let _ = apply_plan("x", &[]);
        let _ = badness("x");
        let _ = is_bad("x");
        let _ = Encoding::from_name("utf-8");
    }

    #[test]
    fn test_quick_fixes() {
        let config = TextFixerConfig::new();
        assert_eq!(fix_text("âœ” No problems", &config), "✔ No problems");
        assert_eq!(fix_encoding("sÃ³", &config), "só");
    }
}
