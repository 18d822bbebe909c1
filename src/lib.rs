use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
    sync::Arc,
};

use jieba_rs::Jieba;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

pub mod config;
mod error;
#[cfg(feature = "onnx")]
mod onnx_builder;
pub mod phoneme;
pub mod text;

pub use config::{FrontendConfig, ResourcePaths};
pub use error::{G2pError, Result};
pub use phoneme::{SYMBOLS, SymbolTable};
pub use text::{
    G2p, G2pOutput, Romanizer, SyllablePosition, WordPosition,
    en::{EnglishDict, EnglishG2p, PhonemePredictor, SubwordTokenizer},
    multilingual,
    yue::{CantoneseG2p, JyutpingDict},
    zh::{MandarinG2p, PinyinRomanizer},
};

use text::{
    en::{ArpabetPredictor, HfTokenizer, SimpleTokenizer},
    normalize::{normalize_words, segment_words},
};

/// Input language, resolved once at the call boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "yue")]
    Cantonese,
    #[serde(rename = "zh")]
    Mandarin,
    #[serde(rename = "en")]
    English,
    #[serde(rename = "multilingual")]
    Multilingual,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cantonese => "yue",
            Self::Mandarin => "zh",
            Self::English => "en",
            Self::Multilingual => "multilingual",
        }
    }

    /// Id written to `lang_ids`. Multilingual output mixes ids.
    pub fn lang_id(&self) -> Option<i32> {
        match self {
            Self::Cantonese => Some(text::yue::LANG_ID),
            Self::Mandarin => Some(text::zh::LANG_ID),
            Self::English => Some(text::en::LANG_ID),
            Self::Multilingual => None,
        }
    }
}

impl FromStr for Language {
    type Err = G2pError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "yue" => Ok(Self::Cantonese),
            "zh" => Ok(Self::Mandarin),
            "en" => Ok(Self::English),
            "multilingual" => Ok(Self::Multilingual),
            other => Err(G2pError::UnsupportedLanguage(other.to_owned())),
        }
    }
}

impl Display for Language {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Model-ready ids for one utterance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EncodedText {
    pub phone_ids: Vec<i64>,
    pub tones: Vec<i32>,
    pub word_pos: Vec<i32>,
    pub syllable_pos: Vec<i32>,
    pub lang_ids: Vec<i32>,
}

/// Normalization, per-language G2P and encoding behind one entry point.
pub struct TextFrontend {
    cantonese: CantoneseG2p,
    mandarin: MandarinG2p,
    english: EnglishG2p,
    jieba: Option<Jieba>,
    config: FrontendConfig,
}

impl TextFrontend {
    pub fn new(
        cantonese: CantoneseG2p,
        mandarin: MandarinG2p,
        english: EnglishG2p,
        config: FrontendConfig,
    ) -> Self {
        let jieba = config.segment_words.then(Jieba::new);
        Self {
            cantonese,
            mandarin,
            english,
            jieba,
            config,
        }
    }

    /// Loads every configured resource. Missing English resources fall back to
    /// [`SimpleTokenizer`] and [`ArpabetPredictor`].
    pub fn from_config(config: &FrontendConfig) -> Result<Self> {
        let res = &config.resources;

        let jyutping = match &res.jyutping_dir {
            Some(dir) => JyutpingDict::load(dir)?,
            None => {
                warn!(
                    "no jyutping dictionary configured, set {} to enable Cantonese lookups",
                    config::RESOURCE_DIR_ENV
                );
                JyutpingDict::new()
            }
        };

        let dict = match &res.cmudict_rep {
            Some(rep) => EnglishDict::load_or_build(rep, res.cmudict_cache.as_ref())?,
            None => {
                warn!("no cmudict configured, every English word goes to the predictor");
                EnglishDict::new()
            }
        };

        let tokenizer: Box<dyn SubwordTokenizer + Send + Sync> = match &res.tokenizer {
            Some(path) => {
                info!("loading tokenizer from {}", path.display());
                Box::new(HfTokenizer::from_file(path)?)
            }
            None => Box::new(SimpleTokenizer),
        };

        let english = EnglishG2p::from_parts(Arc::new(dict), tokenizer, Self::predictor(res)?);

        Ok(Self::new(
            CantoneseG2p::new(jyutping),
            MandarinG2p::default(),
            english,
            config.clone(),
        ))
    }

    #[cfg(feature = "onnx")]
    fn predictor(res: &ResourcePaths) -> Result<Box<dyn PhonemePredictor + Send>> {
        Ok(match &res.g2p_model_dir {
            Some(dir) => {
                info!("loading neural g2p from {}", dir.display());
                Box::new(text::en::NeuralG2p::new(dir)?)
            }
            None => Box::new(ArpabetPredictor::new()),
        })
    }

    #[cfg(not(feature = "onnx"))]
    fn predictor(res: &ResourcePaths) -> Result<Box<dyn PhonemePredictor + Send>> {
        if let Some(dir) = &res.g2p_model_dir {
            warn!(
                "ignoring g2p model {}, built without the onnx feature",
                dir.display()
            );
        }
        Ok(Box::new(ArpabetPredictor::new()))
    }

    pub fn config(&self) -> &FrontendConfig {
        &self.config
    }

    /// Normalizes `text` for `lang` and runs the matching G2P. Returns the
    /// normalized text alongside the aligned features.
    pub fn clean_text(
        &mut self,
        text: &str,
        lang: Language,
        phoneme: Option<&str>,
        padding: bool,
    ) -> Result<(String, G2pOutput)> {
        let mut normalized = normalize_words(text, lang);
        if let Some(jieba) = self.jieba.as_ref().filter(|_| lang != Language::English) {
            normalized = segment_words(jieba, &normalized);
        }
        debug!("normalized {:?} -> {:?}", text, normalized);

        let output = match lang {
            Language::Cantonese => self.cantonese.g2p(&normalized, phoneme, padding)?,
            Language::Mandarin => self.mandarin.g2p(&normalized, phoneme, padding)?,
            Language::English => self.english.g2p(&normalized, phoneme, padding)?,
            Language::Multilingual => {
                let cjk_lang = self.config.multilingual_cjk;
                let cjk: &mut dyn G2p = match cjk_lang {
                    Language::Mandarin => &mut self.mandarin,
                    _ => &mut self.cantonese,
                };
                multilingual::g2p(
                    &normalized,
                    cjk_lang,
                    phoneme,
                    padding,
                    cjk,
                    &mut self.english,
                )?
            }
        };
        Ok((normalized, output))
    }

    /// [`Self::clean_text`] with padding, then phone ids from [`SYMBOLS`].
    pub fn text_to_sequence(
        &mut self,
        text: &str,
        lang: Language,
        phoneme: Option<&str>,
    ) -> Result<EncodedText> {
        let (_, output) = self.clean_text(text, lang, phoneme, true)?;
        Ok(EncodedText {
            phone_ids: SYMBOLS.encode(&output.phones)?,
            tones: output.tones,
            word_pos: output.word_pos,
            syllable_pos: output.syllable_pos,
            lang_ids: output.lang_ids,
        })
    }
}
