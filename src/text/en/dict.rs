use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    sync::atomic::{AtomicUsize, Ordering},
};

use anyhow::Context;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

/// First line of pronunciation data in `cmudict.rep`; everything above is
/// the licence header.
pub const REP_START_LINE: usize = 49;

static CACHE_WRITES: AtomicUsize = AtomicUsize::new(0);

/// Uppercase word to syllables, each syllable a list of ARPAbet phones with
/// optional stress digits.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnglishDict {
    entries: HashMap<String, Vec<Vec<String>>>,
}

impl EnglishDict {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries<I, W>(entries: I) -> Self
    where
        I: IntoIterator<Item = (W, Vec<Vec<String>>)>,
        W: AsRef<str>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(w, syllables)| (w.as_ref().to_uppercase(), syllables))
                .collect(),
        }
    }

    /// Parses the syllabified `cmudict.rep` format:
    /// `WORD  P1 P2 - P3 P4`, data starting at [`REP_START_LINE`].
    pub fn from_rep_str(content: &str) -> Self {
        let mut entries = HashMap::new();
        for line in content.lines().skip(REP_START_LINE - 1) {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let Some((word, pron)) = line.split_once("  ") else {
                warn!("Skipping malformed line: {}", line);
                continue;
            };
            let syllables: Vec<Vec<String>> = pron
                .split(" - ")
                .map(|s| s.split_whitespace().map(str::to_owned).collect())
                .collect();
            entries.insert(word.to_owned(), syllables);
        }
        Self { entries }
    }

    /// Reads the JSON cache when it is present and valid, otherwise parses
    /// `rep` and writes the cache. The cache is written to a temporary file
    /// and renamed into place, so concurrent builders never expose a partial file.
    /// A cache that cannot be written is logged and skipped.
    pub fn load_or_build<P: AsRef<Path>, Q: AsRef<Path>>(
        rep: P,
        cache: Option<Q>,
    ) -> anyhow::Result<Self> {
        let rep = rep.as_ref();
        let cache: Option<&Path> = cache.as_ref().map(|c| c.as_ref());

        if let Some(cache) = cache.filter(|c| c.exists()) {
            match Self::read_cache(cache) {
                Ok(dict) => {
                    debug!("english dict cache hit: {}", cache.display());
                    return Ok(dict);
                }
                Err(e) => warn!(
                    "english dict cache {} is unusable, rebuilding: {:?}",
                    cache.display(),
                    e
                ),
            }
        }

        let content =
            fs::read_to_string(rep).with_context(|| format!("read {}", rep.display()))?;
        let dict = Self::from_rep_str(&content);
        info!("parsed {} english entries from {}", dict.len(), rep.display());

        if let Some(cache) = cache {
            if let Err(e) = dict.write_cache(cache) {
                warn!(
                    "failed to write english dict cache {}: {:?}",
                    cache.display(),
                    e
                );
            }
        }
        Ok(dict)
    }

    fn read_cache(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn write_cache(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let tmp = temp_path(path);
        fs::write(&tmp, serde_json::to_vec(self)?)
            .with_context(|| format!("write {}", tmp.display()))?;
        fs::rename(&tmp, path).with_context(|| format!("rename to {}", path.display()))?;
        info!("wrote english dict cache to {}", path.display());
        Ok(())
    }

    /// Case-insensitive lookup.
    pub fn get(&self, word: &str) -> Option<&[Vec<String>]> {
        self.entries.get(&word.to_uppercase()).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Unique per process and per call, so builders on other threads never
/// share a temporary file.
fn temp_path(path: &Path) -> PathBuf {
    let seq = CACHE_WRITES.fetch_add(1, Ordering::Relaxed);
    path.with_extension(format!("tmp.{}.{}", std::process::id(), seq))
}
