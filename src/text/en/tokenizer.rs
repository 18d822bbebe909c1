use std::{path::Path, str::FromStr};

use once_cell::sync::Lazy;
use regex::Regex;
use tokenizers::Tokenizer;

use crate::error::{G2pError, Result};

/// Sentencepiece marker for a piece that starts a new orthographic word.
pub const WORD_START: char = '▁';

pub trait SubwordTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<String>>;
}

/// A `tokenizers` JSON tokenizer, e.g. the DeBERTa-v3 sentencepiece model.
pub struct HfTokenizer {
    tokenizer: Tokenizer,
}

impl HfTokenizer {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let tokenizer = Tokenizer::from_file(path)?;
        Ok(Self { tokenizer })
    }
}

impl FromStr for HfTokenizer {
    type Err = G2pError;

    fn from_str(json: &str) -> Result<Self> {
        Ok(Self {
            tokenizer: Tokenizer::from_str(json)?,
        })
    }
}

impl SubwordTokenizer for HfTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<String>> {
        let encoding = self.tokenizer.encode(text, false)?;
        Ok(encoding.get_tokens().to_vec())
    }
}

static PIECE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z]+|[^\sA-Za-z]").unwrap());

/// Regex fallback used when no tokenizer file is configured. Letter runs and
/// single symbols become pieces; the first piece after whitespace carries
/// [`WORD_START`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SimpleTokenizer;

impl SubwordTokenizer for SimpleTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<String>> {
        Ok(PIECE_RE
            .find_iter(text)
            .map(|m| {
                let starts_word =
                    m.start() == 0 || text[..m.start()].ends_with(char::is_whitespace);
                if starts_word {
                    format!("{WORD_START}{}", m.as_str())
                } else {
                    m.as_str().to_owned()
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_tokenizer_marks_word_starts() {
        let pieces = SimpleTokenizer.tokenize("Hello, world don't GAN-based").unwrap();
        assert_eq!(
            pieces,
            vec![
                "▁Hello", ",", "▁world", "▁don", "'", "t", "▁GAN", "-", "based"
            ]
        );
    }

    #[test]
    fn test_simple_tokenizer_blank() {
        assert!(SimpleTokenizer.tokenize("   ").unwrap().is_empty());
    }

    #[test]
    fn test_hf_tokenizer_rejects_bad_json() {
        assert!(matches!(
            HfTokenizer::from_str("{}"),
            Err(G2pError::Tokenizer(_))
        ));
    }
}
