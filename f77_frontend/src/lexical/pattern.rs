//! Prioritized token matcher derived from a `LexicalRegistry`
//!
//! Rules are tried in a fixed order at each position and the first rule that
//! matches wins, even when a later rule would match more text.

use crate::tokens::Category;
use std::collections::BTreeMap;

/// Token rules in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Whitespace,
    Comment,
    Label,
    Keyword,
    Identifier,
    Real,
    Integer,
    String,
    Operator,
    Punctuation,
}

impl Rule {
    pub const PRIORITY: [Rule; 10] = [
        Rule::Whitespace,
        Rule::Comment,
        Rule::Label,
        Rule::Keyword,
        Rule::Identifier,
        Rule::Real,
        Rule::Integer,
        Rule::String,
        Rule::Operator,
        Rule::Punctuation,
    ];

    /// Token category produced by the rule, `None` for skipped text
    pub fn category(&self) -> Option<Category> {
        match self {
            Rule::Whitespace | Rule::Comment => None,
            Rule::Label => Some(Category::Label),
            Rule::Keyword => Some(Category::Keyword),
            Rule::Identifier => Some(Category::Ident),
            Rule::Real => Some(Category::LitReal),
            Rule::Integer => Some(Category::LitInt),
            Rule::String => Some(Category::LitString),
            Rule::Operator => Some(Category::Operator),
            Rule::Punctuation => Some(Category::Punct),
        }
    }
}

/// A successful rule match: which rule fired and how many bytes it covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleMatch {
    pub rule: Rule,
    pub len: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TokenPattern {
    keywords: BTreeMap<String, String>,
    operators: Vec<(String, String)>,
    punctuation: Vec<(String, String)>,
    max_label_digits: usize,
}

impl TokenPattern {
    /// `operators` and `punctuation` must already be sorted longest-first
    pub fn new(
        keywords: BTreeMap<String, String>,
        operators: Vec<(String, String)>,
        punctuation: Vec<(String, String)>,
        max_label_digits: usize,
    ) -> Self {
        Self {
            keywords,
            operators,
            punctuation,
            max_label_digits,
        }
    }

    pub fn keyword_kind(&self, lexeme: &str) -> Option<&str> {
        self.keywords
            .get(&lexeme.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn operator_kind(&self, lexeme: &str) -> Option<&str> {
        self.operators
            .iter()
            .find(|(surface, _)| surface.eq_ignore_ascii_case(lexeme))
            .map(|(_, kind)| kind.as_str())
    }

    pub fn punctuation_kind(&self, lexeme: &str) -> Option<&str> {
        self.punctuation
            .iter()
            .find(|(surface, _)| surface == lexeme)
            .map(|(_, kind)| kind.as_str())
    }

    /// Operators in alternation order
    pub fn operators(&self) -> impl Iterator<Item = (&str, &str)> {
        self.operators.iter().map(|(s, k)| (s.as_str(), k.as_str()))
    }

    /// Try every rule at `offset`. `line_start` is the byte offset where the
    /// current source line begins; comments and labels depend on it.
    pub fn match_at(&self, source: &str, offset: usize, line_start: usize) -> Option<RuleMatch> {
        let rest = &source[offset..];
        if rest.is_empty() {
            return None;
        }

        Rule::PRIORITY.iter().find_map(|&rule| {
            let len = match rule {
                Rule::Whitespace => scan_whitespace(rest),
                Rule::Comment if offset == line_start => scan_comment(rest),
                Rule::Comment => 0,
                Rule::Label if source[line_start..offset].chars().all(is_horizontal_space) => {
                    self.scan_label(rest)
                }
                Rule::Label => 0,
                Rule::Keyword => self.scan_keyword(source, offset),
                Rule::Identifier => scan_word(rest),
                Rule::Real => self.scan_real(rest),
                Rule::Integer => scan_digits(rest),
                Rule::String => scan_string(rest),
                Rule::Operator => longest_prefix(&self.operators, rest, true),
                Rule::Punctuation => longest_prefix(&self.punctuation, rest, false),
            };
            (len > 0).then_some(RuleMatch { rule, len })
        })
    }

    /// 1..=max digits followed by at least one space or tab, which is left
    /// for the whitespace rule
    fn scan_label(&self, rest: &str) -> usize {
        let digits = scan_digits(rest);
        if digits == 0 || digits > self.max_label_digits {
            return 0;
        }
        match rest[digits..].chars().next() {
            Some(c) if is_horizontal_space(c) => digits,
            _ => 0,
        }
    }

    /// A whole word that is a registered keyword and is not the tail of a
    /// longer word
    fn scan_keyword(&self, source: &str, offset: usize) -> usize {
        let preceded_by_word = source[..offset]
            .chars()
            .next_back()
            .is_some_and(is_word_char);
        if preceded_by_word {
            return 0;
        }

        let len = scan_word(&source[offset..]);
        if len > 0 && self.keyword_kind(&source[offset..offset + len]).is_some() {
            len
        } else {
            0
        }
    }

    /// `d.d`, `d.`, `.d` or `d`, each with an optional `e`/`d` exponent. A
    /// bare integer only counts when the exponent is present. A trailing
    /// `d`/`D` suffix without exponent digits is accepted after a decimal
    /// point. The point is not taken when it opens a dotted operator, so
    /// `15.GT.X` stays an integer followed by `.GT.`.
    fn scan_real(&self, rest: &str) -> usize {
        let int_digits = scan_digits(rest);
        let mut len = int_digits;
        let mut has_point = false;

        if rest[len..].starts_with('.') && !self.opens_dotted_operator(&rest[len..]) {
            let frac_digits = scan_digits(&rest[len + 1..]);
            if int_digits == 0 && frac_digits == 0 {
                return 0;
            }
            len += 1 + frac_digits;
            has_point = true;
        } else if int_digits == 0 {
            return 0;
        }

        let exponent = scan_exponent(&rest[len..]);
        if exponent > 0 {
            return len + exponent;
        }
        if !has_point {
            return 0;
        }

        let mut tail = rest[len..].chars();
        match (tail.next(), tail.next()) {
            (Some('d' | 'D'), next) if !next.is_some_and(is_word_char) => len + 1,
            _ => len,
        }
    }

    fn opens_dotted_operator(&self, rest: &str) -> bool {
        self.operators.iter().any(|(surface, _)| {
            surface.starts_with('.')
                && rest.len() >= surface.len()
                && rest.is_char_boundary(surface.len())
                && rest[..surface.len()].eq_ignore_ascii_case(surface)
        })
    }
}

fn is_horizontal_space(c: char) -> bool {
    c == ' ' || c == '\t'
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn scan_whitespace(rest: &str) -> usize {
    rest.bytes()
        .take_while(|b| matches!(b, b' ' | b'\t' | b'\r' | b'\n'))
        .count()
}

/// `c`, `C` or `*` in column 1, through the end of the line
fn scan_comment(rest: &str) -> usize {
    match rest.chars().next() {
        Some('c' | 'C' | '*') => rest.find('\n').unwrap_or(rest.len()),
        _ => 0,
    }
}

fn scan_digits(rest: &str) -> usize {
    rest.bytes().take_while(u8::is_ascii_digit).count()
}

/// Letter followed by letters, digits or underscores
fn scan_word(rest: &str) -> usize {
    match rest.chars().next() {
        Some(c) if c.is_ascii_alphabetic() => {
            1 + rest[1..].chars().take_while(|&c| is_word_char(c)).count()
        }
        _ => 0,
    }
}

/// `[eEdD][+-]?digits`, zero if no digits follow
fn scan_exponent(rest: &str) -> usize {
    let bytes = rest.as_bytes();
    if !matches!(bytes.first(), Some(b'e' | b'E' | b'd' | b'D')) {
        return 0;
    }
    let sign = usize::from(matches!(bytes.get(1), Some(b'+' | b'-')));
    let digits = scan_digits(&rest[1 + sign..]);
    if digits == 0 {
        0
    } else {
        1 + sign + digits
    }
}

/// Single-quoted literal with `''` as an escaped quote. May span lines.
/// Zero when the closing quote is missing.
fn scan_string(rest: &str) -> usize {
    if !rest.starts_with('\'') {
        return 0;
    }
    let bytes = rest.as_bytes();
    let mut i = 1;
    while i < bytes.len() {
        if bytes[i] == b'\'' {
            if bytes.get(i + 1) == Some(&b'\'') {
                i += 2;
                continue;
            }
            return i + 1;
        }
        i += 1;
    }
    0
}

fn longest_prefix(alternatives: &[(String, String)], rest: &str, ignore_case: bool) -> usize {
    alternatives
        .iter()
        .find(|(surface, _)| {
            let n = surface.len();
            rest.len() >= n
                && rest.is_char_boundary(n)
                && if ignore_case {
                    rest[..n].eq_ignore_ascii_case(surface)
                } else {
                    &rest[..n] == surface
                }
        })
        .map_or(0, |(surface, _)| surface.len())
}
