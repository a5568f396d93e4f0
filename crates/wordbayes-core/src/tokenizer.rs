//! Tokenizer boundary
//!
//! The classifier never splits text itself. It hands every document to a
//! [`Tokenizer`] supplied at construction and counts whatever comes back.

use async_trait::async_trait;

use crate::error::TokenizerError;

/// Non-ASCII punctuation folded to whitespace alongside ASCII punctuation.
const EXTRA_PUNCTUATION: &[char] = &[
    '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}', '\u{2013}', '\u{2014}', '\u{2026}', '\u{00AB}',
    '\u{00BB}', '\u{00BF}', '\u{00A1}', '\u{3001}', '\u{3002}',
];

/// Splits a document into tokens.
///
/// Implementations may do real async work (remote services, model inference);
/// the classifier awaits the call once per `learn` / `classify`.
#[async_trait]
pub trait Tokenizer: Send + Sync {
    async fn tokenize(&self, document: &str) -> Result<Vec<String>, TokenizerError>;
}

/// Punctuation becomes whitespace, whitespace runs separate tokens, empty
/// tokens are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTokenizer {
    /// Lowercase every token before it is returned
    pub lowercase: bool,
}

impl DefaultTokenizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lowercase(mut self, lowercase: bool) -> Self {
        self.lowercase = lowercase;
        self
    }

    /// Synchronous core of the default tokenizer.
    pub fn split(&self, document: &str) -> Vec<String> {
        let cleaned: String = document
            .chars()
            .map(|c| if is_punctuation(c) { ' ' } else { c })
            .collect();

        cleaned
            .split_whitespace()
            .map(|token| {
                if self.lowercase {
                    token.to_lowercase()
                } else {
                    token.to_string()
                }
            })
            .collect()
    }
}

#[async_trait]
impl Tokenizer for DefaultTokenizer {
    async fn tokenize(&self, document: &str) -> Result<Vec<String>, TokenizerError> {
        Ok(self.split(document))
    }
}

fn is_punctuation(c: char) -> bool {
    c.is_ascii_punctuation() || EXTRA_PUNCTUATION.contains(&c)
}

/// Tokenizer backed by a plain closure.
pub struct FnTokenizer<F> {
    f: F,
}

#[async_trait]
impl<F> Tokenizer for FnTokenizer<F>
where
    F: Fn(&str) -> Result<Vec<String>, TokenizerError> + Send + Sync,
{
    async fn tokenize(&self, document: &str) -> Result<Vec<String>, TokenizerError> {
        (self.f)(document)
    }
}

/// Wrap an infallible closure as a [`Tokenizer`].
pub fn from_fn<F>(
    f: F,
) -> FnTokenizer<impl Fn(&str) -> Result<Vec<String>, TokenizerError> + Send + Sync>
where
    F: Fn(&str) -> Vec<String> + Send + Sync,
{
    FnTokenizer {
        f: move |document: &str| -> Result<Vec<String>, TokenizerError> { Ok(f(document)) },
    }
}

/// Wrap a fallible closure as a [`Tokenizer`]. Errors reach the caller of
/// `learn` / `classify` unchanged.
pub fn try_from_fn<F>(f: F) -> FnTokenizer<F>
where
    F: Fn(&str) -> Result<Vec<String>, TokenizerError> + Send + Sync,
{
    FnTokenizer { f }
}
