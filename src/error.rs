use serde_json::Error as JsonError;
use std::{
    error::Error,
    fmt::{Display, Formatter, Result as FmtResult},
    io::Error as IoError,
};

#[derive(Debug)]
pub enum G2pError {
    /// Language tag outside `yue`, `zh`, `en`, `multilingual`.
    UnsupportedLanguage(String),
    /// Romanization syllable count differs from the character count.
    MisalignedTranscription { expected: usize, actual: usize },
    UnparsableSyllable(String),
    /// Multilingual dispatch given a language that cannot handle a CJK run.
    InvalidLanguageForScript(String),
    NotImplemented(&'static str),
    UnknownSymbol(String),
    UnknownSymbolId(i64),
    Io(IoError),
    Json(JsonError),
    Tokenizer(String),
    AnyHow(anyhow::Error),
}

pub type Result<T> = std::result::Result<T, G2pError>;

impl Error for G2pError {}

impl Display for G2pError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "G2pError: ")?;
        match self {
            Self::UnsupportedLanguage(lang) => write!(f, "language {lang:?} is not supported"),
            Self::MisalignedTranscription { expected, actual } => write!(
                f,
                "transcription has {actual} syllables but the text has {expected} characters"
            ),
            Self::UnparsableSyllable(s) => write!(f, "failed to parse syllable {s:?}"),
            Self::InvalidLanguageForScript(lang) => {
                write!(f, "invalid language {lang:?} for CJK text, use 'yue' or 'zh'")
            }
            Self::NotImplemented(what) => write!(f, "{what} is not supported yet"),
            Self::UnknownSymbol(s) => write!(f, "symbol {s:?} is not in the vocabulary"),
            Self::UnknownSymbolId(id) => write!(f, "symbol id {id} is out of range"),
            Self::Io(e) => Display::fmt(e, f),
            Self::Json(e) => Display::fmt(e, f),
            Self::Tokenizer(e) => write!(f, "tokenizer error: {e}"),
            Self::AnyHow(e) => Display::fmt(e, f),
        }
    }
}

impl From<IoError> for G2pError {
    fn from(value: IoError) -> Self {
        Self::Io(value)
    }
}

impl From<JsonError> for G2pError {
    fn from(value: JsonError) -> Self {
        Self::Json(value)
    }
}

impl From<anyhow::Error> for G2pError {
    fn from(value: anyhow::Error) -> Self {
        Self::AnyHow(value)
    }
}

impl From<tokenizers::Error> for G2pError {
    fn from(value: tokenizers::Error) -> Self {
        Self::Tokenizer(value.to_string())
    }
}
