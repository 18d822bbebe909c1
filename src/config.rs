use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::{Language, error::Result, text::yue::dict::WORDS_DICT_FILE};

pub const RESOURCE_DIR_ENV: &str = "G2P_RESOURCE_DIR";
pub const CMUDICT_CACHE_ENV: &str = "G2P_CMUDICT_CACHE";
pub const MULTILINGUAL_CJK_ENV: &str = "G2P_MULTILINGUAL_CJK";

const CMUDICT_REP_FILE: &str = "cmudict.rep";
const CMUDICT_CACHE_FILE: &str = "cmudict_cache.json";
const TOKENIZER_FILE: &str = "tokenizer.json";
const G2P_MODEL_DIR: &str = "g2p_en";

/// Locations of the external phonetic resources. Anything left unset falls
/// back to a built-in alternative when the frontend is created.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourcePaths {
    /// Syllabified CMUdict (`cmudict.rep`).
    pub cmudict_rep: Option<PathBuf>,
    /// JSON cache of the parsed CMUdict, written on first build.
    pub cmudict_cache: Option<PathBuf>,
    /// Directory holding the Rime jyutping tables.
    pub jyutping_dir: Option<PathBuf>,
    /// `tokenizers` JSON file for English subword splitting.
    pub tokenizer: Option<PathBuf>,
    /// Neural English G2P model directory, used with the `onnx` feature.
    pub g2p_model_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontendConfig {
    /// Language used for CJK runs of multilingual text.
    pub multilingual_cjk: Language,
    /// Segment CJK text into words with jieba before G2P.
    pub segment_words: bool,
    pub resources: ResourcePaths,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            multilingual_cjk: Language::Cantonese,
            segment_words: false,
            resources: ResourcePaths::default(),
        }
    }
}

impl FrontendConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        info!("loaded frontend config from {}", path.display());
        Ok(config)
    }

    /// Applies `G2P_RESOURCE_DIR`, `G2P_CMUDICT_CACHE` and `G2P_MULTILINGUAL_CJK`.
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Like [`Self::with_env_overrides`] with an arbitrary variable source.
    /// The resource dir only fills paths that are unset and exist on disk,
    /// except the cache which is created on demand.
    pub fn with_overrides<F>(mut self, var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = var(RESOURCE_DIR_ENV) {
            let dir = PathBuf::from(dir);
            debug!("filling resource paths from {}", dir.display());
            let res = &mut self.resources;
            fill_existing(&mut res.cmudict_rep, dir.join(CMUDICT_REP_FILE));
            fill_existing(&mut res.tokenizer, dir.join(TOKENIZER_FILE));
            fill_existing(&mut res.g2p_model_dir, dir.join(G2P_MODEL_DIR));
            if dir.join(WORDS_DICT_FILE).exists() {
                res.jyutping_dir.get_or_insert_with(|| dir.clone());
            }
            res.cmudict_cache
                .get_or_insert_with(|| dir.join(CMUDICT_CACHE_FILE));
        }
        if let Some(cache) = var(CMUDICT_CACHE_ENV) {
            self.resources.cmudict_cache = Some(PathBuf::from(cache));
        }
        if let Some(lang) = var(MULTILINGUAL_CJK_ENV) {
            self.multilingual_cjk = lang.parse()?;
        }
        Ok(self)
    }
}

fn fill_existing(slot: &mut Option<PathBuf>, candidate: PathBuf) {
    if slot.is_none() && candidate.exists() {
        *slot = Some(candidate);
    }
}
