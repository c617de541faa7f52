//! Answer handling: raw model text → canonical comparable token.
//!
//! Extraction picks the answer-bearing part of a reply; normalization turns
//! it into the token every strategy votes on.

pub mod extract;
pub mod normalize;

/// The comparable token for a raw reply: extraction, then normalization
///
/// ```
/// use quorum_domain::answer_token;
///
/// assert_eq!(answer_token("Let me think.\nFinal answer: 42"), "42");
/// assert_eq!(answer_token("42"), "42");
/// ```
pub fn answer_token(raw: &str) -> String {
    normalize::normalize_answer(&extract::extract_answer(raw))
}
