use alloc::vec::Vec;

use crate::color::parse_hex;

/// Tokens of one non-empty clause
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Clause<'a> {
    /// Index of the clause among all `;`-delimited clauses
    pub(super) index: usize,
    pub(super) tokens: Vec<&'a str>,
}

impl<'a> Clause<'a> {
    pub(super) fn keyword(&self) -> &'a str {
        self.tokens[0]
    }

    pub(super) fn args(&self) -> &[&'a str] {
        &self.tokens[1..]
    }
}

/// Split script text into clauses of whitespace-separated tokens.
///
/// A token starting with `#` begins a comment that runs to the end of the
/// line or the end of the clause, unless it is a color literal following a
/// keyword. Empty and comment-only clauses are dropped.
pub(super) fn clauses(text: &str) -> impl Iterator<Item = Clause<'_>> {
    text.split(';').enumerate().filter_map(|(index, raw)| {
        let mut tokens = Vec::new();
        for line in raw.lines() {
            for word in line.split_whitespace() {
                if starts_comment(word, tokens.is_empty()) {
                    break;
                }
                tokens.push(word);
            }
        }
        (!tokens.is_empty()).then_some(Clause { index, tokens })
    })
}

fn starts_comment(word: &str, keyword_expected: bool) -> bool {
    word.starts_with('#') && (keyword_expected || parse_hex(word).is_none())
}
