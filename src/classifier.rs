//! Token classification and aggregation: the core of `POST /bfhl`.
//!
//! Each input token is classified by the first matching rule:
//!
//! ```text
//! integer literal      → odd_numbers / even_numbers  (original text kept)
//! letters only         → alphabets                   (uppercased)
//! no alphanumerics     → special_characters          (unchanged)
//! anything else        → dropped
//! ```
//!
//! Integers are summed in an `i128` accumulator. The uppercased letters of
//! every alphabetic token feed [`concat_string`].

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClassifyError {
    #[error("input token list is empty")]
    EmptyInput,

    #[error("integer token '{0}' is out of range")]
    IntegerOverflow(String),

    #[error("integer sum overflow")]
    SumOverflow,
}

/// Which case position 0 of the concat string takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseStart {
    /// Even positions uppercase, odd positions lowercase.
    Upper,
    /// Even positions lowercase, odd positions uppercase.
    Lower,
}

/// Case rule applied by [`classify`]. Not configurable at runtime.
pub const CONCAT_CASE_START: CaseStart = CaseStart::Upper;

/// Category of a single token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Integer(i128),
    Alphabetic,
    Special,
    Unclassified,
}

/// Aggregated result for one token list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    pub odd_numbers: Vec<String>,
    pub even_numbers: Vec<String>,
    pub alphabets: Vec<String>,
    pub special_characters: Vec<String>,
    pub sum: i128,
    pub concat_string: String,
}

/// Classify a single token.
///
/// Integer literals are optional surrounding whitespace, an optional `+`/`-`
/// sign, then ASCII digits. A literal that does not fit in `i128` is an
/// error rather than falling through to the other rules.
pub fn classify_token(token: &str) -> Result<TokenKind, ClassifyError> {
    if is_integer_literal(token) {
        return token
            .trim()
            .parse::<i128>()
            .map(TokenKind::Integer)
            .map_err(|_| ClassifyError::IntegerOverflow(token.to_string()));
    }

    if token.is_empty() {
        return Ok(TokenKind::Unclassified);
    }
    if token.chars().all(is_letter) {
        return Ok(TokenKind::Alphabetic);
    }
    if !token.chars().any(char::is_alphanumeric) {
        return Ok(TokenKind::Special);
    }
    Ok(TokenKind::Unclassified)
}

/// Alphabetic but not numeric: letter numbers such as `Ⅻ` are excluded.
fn is_letter(c: char) -> bool {
    c.is_alphabetic() && !c.is_numeric()
}

fn is_integer_literal(token: &str) -> bool {
    let t = token.trim();
    let digits = t.strip_prefix(['+', '-']).unwrap_or(t);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Run the full pipeline over `tokens`.
///
/// Output sequences keep input order. Returns [`ClassifyError::EmptyInput`]
/// for an empty list; no partial result is ever returned.
pub fn classify<S: AsRef<str>>(tokens: &[S]) -> Result<Classification, ClassifyError> {
    if tokens.is_empty() {
        return Err(ClassifyError::EmptyInput);
    }

    let mut out = Classification::default();
    let mut letters = String::new();

    for token in tokens {
        let token = token.as_ref();
        match classify_token(token)? {
            TokenKind::Integer(value) => {
                if value.rem_euclid(2) == 0 {
                    out.even_numbers.push(token.to_string());
                } else {
                    out.odd_numbers.push(token.to_string());
                }
                out.sum = out.sum.checked_add(value).ok_or(ClassifyError::SumOverflow)?;
            }
            TokenKind::Alphabetic => {
                let upper = token.to_uppercase();
                letters.push_str(&upper);
                out.alphabets.push(upper);
            }
            TokenKind::Special => out.special_characters.push(token.to_string()),
            TokenKind::Unclassified => debug!(token, "token dropped: matches no category"),
        }
    }

    out.concat_string = concat_string(&letters, CONCAT_CASE_START);
    Ok(out)
}

/// Reverse `letters` by character, then alternate case by position.
///
/// The output has exactly one character per input character: a letter whose
/// case mapping expands to several characters (`İ` lowercases to `i̇`) is
/// kept as is.
pub fn concat_string(letters: &str, start: CaseStart) -> String {
    let mut out = String::with_capacity(letters.len());
    for (i, c) in letters.chars().rev().enumerate() {
        let upper = (i % 2 == 0) == (start == CaseStart::Upper);
        let mapped = if upper {
            single_char(c.to_uppercase(), c)
        } else {
            single_char(c.to_lowercase(), c)
        };
        out.push(mapped);
    }
    out
}

fn single_char(mut mapping: impl Iterator<Item = char>, original: char) -> char {
    match (mapping.next(), mapping.next()) {
        (Some(m), None) => m,
        _ => original,
    }
}
