//! Configuration for the fixing pipeline.

use crate::plan::Normalization;

/// When to decode HTML character references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnescapeMode {
    /// Decode references, but switch off for strings containing a literal
    /// `<`, which are probably actual HTML whose entities are intentional.
    #[default]
    Auto,
    /// Always decode references.
    Always,
    /// Never decode references.
    Never,
}

/// Options for [`fix_text`](crate::fix_text) and friends.
///
/// Built in builder style; each setter returns `&mut Self` for chaining. The
/// configuration is read-only during a call.
///
/// # Example
///
/// ```
/// use textmend::TextFixerConfig;
///
/// let mut config = TextFixerConfig::new();
/// config.uncurl_quotes(false).normalization(None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextFixerConfig {
    pub(crate) unescape_html: UnescapeMode,
    pub(crate) fix_encoding: bool,
    pub(crate) restore_byte_a0: bool,
    pub(crate) replace_lossy_sequences: bool,
    pub(crate) decode_inconsistent_utf8: bool,
    pub(crate) fix_c1_controls: bool,
    pub(crate) fix_latin_ligatures: bool,
    pub(crate) fix_character_width: bool,
    pub(crate) uncurl_quotes: bool,
    pub(crate) fix_line_breaks: bool,
    pub(crate) remove_terminal_escapes: bool,
    pub(crate) remove_control_chars: bool,
    pub(crate) normalization: Option<Normalization>,
    pub(crate) max_iterations: usize,
    pub(crate) max_segment_length: usize,
}

impl Default for TextFixerConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl TextFixerConfig {
    /// Create a configuration with every fix enabled, NFC normalization,
    /// and a search depth of 16 steps.
    pub const fn new() -> Self {
        Self {
            unescape_html: UnescapeMode::Auto,
            fix_encoding: true,
            restore_byte_a0: true,
            replace_lossy_sequences: true,
            decode_inconsistent_utf8: true,
            fix_c1_controls: true,
            fix_latin_ligatures: true,
            fix_character_width: true,
            uncurl_quotes: true,
            fix_line_breaks: true,
            remove_terminal_escapes: true,
            remove_control_chars: true,
            normalization: Some(Normalization::Nfc),
            max_iterations: 16,
            max_segment_length: 1_000_000,
        }
    }

    /// Set when HTML character references are decoded.
    pub fn unescape_html(&mut self, mode: UnescapeMode) -> &mut Self {
        self.unescape_html = mode;
        self
    }

    /// Enable or disable mojibake repair entirely.
    pub fn fix_encoding(&mut self, enabled: bool) -> &mut Self {
        self.fix_encoding = enabled;
        self
    }

    /// Allow a plain space to be read back as a non-breaking space when that
    /// completes a fixable mojibake sequence. Safer off, more thorough on.
    pub fn restore_byte_a0(&mut self, enabled: bool) -> &mut Self {
        self.restore_byte_a0 = enabled;
        self
    }

    /// Allow mojibake that was partially destroyed (replaced by U+FFFD) to
    /// be quarantined into a single U+FFFD so the rest decodes.
    pub fn replace_lossy_sequences(&mut self, enabled: bool) -> &mut Self {
        self.replace_lossy_sequences = enabled;
        self
    }

    /// Allow isolated runs of UTF-8 mojibake to be decoded in place when the
    /// whole string has no consistent reinterpretation.
    pub fn decode_inconsistent_utf8(&mut self, enabled: bool) -> &mut Self {
        self.decode_inconsistent_utf8 = enabled;
        self
    }

    /// Allow C1 control characters to be read as their Windows-1252
    /// equivalents.
    pub fn fix_c1_controls(&mut self, enabled: bool) -> &mut Self {
        self.fix_c1_controls = enabled;
        self
    }

    /// Replace Latin ligature codepoints with the letters they contain.
    pub fn fix_latin_ligatures(&mut self, enabled: bool) -> &mut Self {
        self.fix_latin_ligatures = enabled;
        self
    }

    /// Replace fullwidth and halfwidth forms with standard-width characters.
    pub fn fix_character_width(&mut self, enabled: bool) -> &mut Self {
        self.fix_character_width = enabled;
        self
    }

    /// Replace curly quotes with straight quotes.
    pub fn uncurl_quotes(&mut self, enabled: bool) -> &mut Self {
        self.uncurl_quotes = enabled;
        self
    }

    /// Convert all line breaks to `\n`.
    pub fn fix_line_breaks(&mut self, enabled: bool) -> &mut Self {
        self.fix_line_breaks = enabled;
        self
    }

    /// Strip ANSI terminal escape sequences.
    pub fn remove_terminal_escapes(&mut self, enabled: bool) -> &mut Self {
        self.remove_terminal_escapes = enabled;
        self
    }

    /// Remove control characters with no effect on displayed text.
    pub fn remove_control_chars(&mut self, enabled: bool) -> &mut Self {
        self.remove_control_chars = enabled;
        self
    }

    /// Choose the Unicode normal form applied at the end of each pass, or
    /// `None` for no normalization.
    pub fn normalization(&mut self, form: Option<Normalization>) -> &mut Self {
        self.normalization = form;
        self
    }

    /// Cap the number of repair steps the search may take.
    pub fn max_iterations(&mut self, cap: usize) -> &mut Self {
        self.max_iterations = cap;
        self
    }

    /// Cap the size of the segments [`fix_text`](crate::fix_text) fixes at
    /// once.
    pub fn max_segment_length(&mut self, cap: usize) -> &mut Self {
        self.max_segment_length = cap;
        self
    }
}
