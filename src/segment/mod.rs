//! Sentence segmentation.
//!
//! A paragraph is cut after every sentence-terminal mark that is not inside a
//! quotation. Japanese narrative nests dialogue in 「」, and a 。 inside the
//! brackets belongs to the quoted speech, not to the narration around it:
//!
//! ```
//! use yomiage::segment::{split_sentences, SentenceRules};
//!
//! let rules = SentenceRules::default();
//! assert_eq!(
//!     split_sentences("あ。「い。」う。", &rules),
//!     vec!["あ。", "「い。」う。"]
//! );
//! ```
//!
//! Segmentation is a partition: joining the pieces gives back the input,
//! except for a trailing whitespace-only remainder, which is dropped.

/// Punctuation that drives segmentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentenceRules {
    pub open_quotes: Vec<char>,
    pub close_quotes: Vec<char>,
    pub terminals: Vec<char>,
}

impl Default for SentenceRules {
    fn default() -> Self {
        Self {
            open_quotes: vec!['「'],
            close_quotes: vec!['」'],
            terminals: vec!['。'],
        }
    }
}

impl SentenceRules {
    /// Rules with no quotes and no terminals; every paragraph is one sentence.
    pub fn empty() -> Self {
        Self {
            open_quotes: Vec::new(),
            close_quotes: Vec::new(),
            terminals: Vec::new(),
        }
    }

    pub fn with_quote_pair(mut self, open: char, close: char) -> Self {
        self.open_quotes.push(open);
        self.close_quotes.push(close);
        self
    }

    pub fn with_terminal(mut self, terminal: char) -> Self {
        self.terminals.push(terminal);
        self
    }

    fn classify(&self, c: char) -> Mark {
        let opens = self.open_quotes.contains(&c);
        let closes = self.close_quotes.contains(&c);
        if opens && closes {
            Mark::Toggle
        } else if opens {
            Mark::Open
        } else if self.close_quotes.contains(&c) {
            Mark::Close
        } else if self.terminals.contains(&c) {
            Mark::Terminal
        } else {
            Mark::Plain
        }
    }
}

#[derive(Clone, Copy)]
enum Mark {
    Open,
    Close,
    /// Same character opens and closes, like `"`.
    Toggle,
    Terminal,
    Plain,
}

/// Iterator over the sentences of one paragraph.
///
/// Quotation state is a single flag: any opening mark sets it, any closing
/// mark clears it, and a mark that is both flips it.
pub struct Sentences<'a> {
    text: &'a str,
    rules: &'a SentenceRules,
    pos: usize,
    in_quote: bool,
}

impl<'a> Iterator for Sentences<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let start = self.pos;
        let rest = &self.text[start..];

        for (offset, c) in rest.char_indices() {
            match self.rules.classify(c) {
                Mark::Open => self.in_quote = true,
                Mark::Close => self.in_quote = false,
                Mark::Toggle => self.in_quote = !self.in_quote,
                Mark::Terminal if !self.in_quote => {
                    let end = start + offset + c.len_utf8();
                    self.pos = end;
                    return Some(&self.text[start..end]);
                }
                Mark::Terminal | Mark::Plain => {}
            }
        }

        self.pos = self.text.len();
        if rest.trim().is_empty() {
            None
        } else {
            Some(rest)
        }
    }
}

/// Lazily split a paragraph into sentences.
pub fn sentences<'a>(text: &'a str, rules: &'a SentenceRules) -> Sentences<'a> {
    Sentences {
        text,
        rules,
        pos: 0,
        in_quote: false,
    }
}

/// Split a paragraph into sentences.
pub fn split_sentences<'a>(text: &'a str, rules: &'a SentenceRules) -> Vec<&'a str> {
    sentences(text, rules).collect()
}
