//! Dictionary-free analyzer that splits text into runs of one script.

use super::{AnalyzedToken, Analyzer, AnalyzerError};

/// Writing-system class of a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScriptClass {
    Kanji,
    Hiragana,
    Katakana,
    Latin,
    Digit,
    Punctuation,
    Whitespace,
    Other,
}

impl ScriptClass {
    pub fn of(c: char) -> Self {
        if c.is_whitespace() {
            return ScriptClass::Whitespace;
        }
        let cp = c as u32;
        match cp {
            // CJK Unified Ideographs, Extension A, Extension B, Compatibility
            0x4E00..=0x9FFF | 0x3400..=0x4DBF | 0x20000..=0x2A6DF | 0xF900..=0xFAFF => {
                ScriptClass::Kanji
            }
            // 々 〆 〇 ヶ behave like kanji in running text
            0x3005 | 0x3006 | 0x3007 | 0x30F6 => ScriptClass::Kanji,
            0x3041..=0x309F => ScriptClass::Hiragana,
            // Katakana, phonetic extensions, halfwidth katakana
            0x30A0..=0x30FF | 0x31F0..=0x31FF | 0xFF66..=0xFF9F => ScriptClass::Katakana,
            // Fullwidth digits
            0xFF10..=0xFF19 => ScriptClass::Digit,
            // Fullwidth Latin letters
            0xFF21..=0xFF3A | 0xFF41..=0xFF5A => ScriptClass::Latin,
            // CJK symbols and punctuation, fullwidth/halfwidth forms
            0x3000..=0x303F | 0xFF01..=0xFF0F | 0xFF1A..=0xFF20 | 0xFF3B..=0xFF40
            | 0xFF5B..=0xFF65 => ScriptClass::Punctuation,
            _ if c.is_ascii_digit() => ScriptClass::Digit,
            _ if c.is_alphabetic() && cp < 0x0250 => ScriptClass::Latin,
            _ if c.is_ascii_punctuation() => ScriptClass::Punctuation,
            _ => ScriptClass::Other,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ScriptClass::Kanji => "kanji",
            ScriptClass::Hiragana => "hiragana",
            ScriptClass::Katakana => "katakana",
            ScriptClass::Latin => "latin",
            ScriptClass::Digit => "digit",
            ScriptClass::Punctuation => "punctuation",
            ScriptClass::Whitespace => "whitespace",
            ScriptClass::Other => "other",
        }
    }

    /// Punctuation never merges with its neighbours.
    fn merges(self) -> bool {
        !matches!(self, ScriptClass::Punctuation)
    }
}

/// Splits text at script changes; each run's single feature is its class name.
///
/// Whitespace runs are returned as sentinels. This is no substitute for a
/// real morphological analyzer, but it keeps the pipeline usable without a
/// dictionary.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptAnalyzer;

impl ScriptAnalyzer {
    pub fn new() -> Self {
        Self
    }
}

impl Analyzer for ScriptAnalyzer {
    fn analyze(&self, text: &str) -> Result<Vec<AnalyzedToken>, AnalyzerError> {
        let mut tokens = Vec::new();
        let mut run: Option<(ScriptClass, usize)> = None;

        for (i, c) in text.char_indices() {
            let class = ScriptClass::of(c);
            if let Some((current, start)) = run {
                if current == class && class.merges() {
                    continue;
                }
                tokens.push(make_token(&text[start..i], current));
            }
            run = Some((class, i));
        }

        if let Some((class, start)) = run {
            tokens.push(make_token(&text[start..], class));
        }

        Ok(tokens)
    }
}

fn make_token(surface: &str, class: ScriptClass) -> AnalyzedToken {
    if class == ScriptClass::Whitespace {
        AnalyzedToken::sentinel(surface)
    } else {
        AnalyzedToken::new(surface, vec![class.name().to_string()])
    }
}
