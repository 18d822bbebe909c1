use std::{collections::HashMap, fs, path::Path};

use anyhow::Context;
use log::{debug, info, warn};

use crate::{
    error::{G2pError, Result},
    phoneme::detection::is_punctuation_char,
    text::Romanizer,
};

pub const WORDS_DICT_FILE: &str = "jyut6ping3.words.dict.yaml";
pub const CHAR_TABLE_FILE: &str = "jyutping_dictionary.json";

/// Character and word jyutping table, segmented by longest match.
#[derive(Debug, Default, Clone)]
pub struct JyutpingDict {
    chars: HashMap<char, String>,
    words: HashMap<String, Vec<String>>,
    max_word_len: usize,
}

impl JyutpingDict {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a Rime style table: an optional YAML header closed by `...`,
    /// then `word<TAB>syllables[<TAB>weight]` lines. For characters the first
    /// reading listed wins.
    pub fn from_rime_str(content: &str) -> Self {
        let mut dict = Self::default();
        dict.extend_rime_str(content);
        dict
    }

    pub fn extend_rime_str(&mut self, content: &str) {
        let body = match content.split_once("\n...") {
            Some((_, body)) => body,
            None => content,
        };

        for line in body.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let columns: Vec<&str> = line.split('\t').collect();
            if columns.len() < 2 {
                warn!("Skipping malformed line: {}", line);
                continue;
            }
            let word = columns[0];
            let syllables: Vec<String> = columns[1].split_whitespace().map(str::to_owned).collect();
            let len = word.chars().count();
            if len != syllables.len() {
                warn!(
                    "char and jyutping size not match in dict, {} vs {:?}",
                    word, syllables
                );
                continue;
            }
            if len == 1 {
                if let Some(c) = word.chars().next() {
                    self.chars.entry(c).or_insert_with(|| syllables[0].clone());
                }
            } else {
                self.max_word_len = self.max_word_len.max(len);
                self.words.entry(word.to_owned()).or_insert(syllables);
            }
        }
    }

    /// Adds a `{"4F60": "nei5 nei2"}` style code point table. Entries already
    /// present are kept.
    pub fn extend_char_table_json(&mut self, json: &str) -> Result<()> {
        let table: HashMap<String, String> = serde_json::from_str(json)?;
        for (code, readings) in table {
            let Some(c) = u32::from_str_radix(&code, 16).ok().and_then(char::from_u32) else {
                warn!("Skipping malformed code point: {}", code);
                continue;
            };
            if let Some(first) = readings.split_whitespace().next() {
                self.chars.entry(c).or_insert_with(|| first.to_owned());
            }
        }
        Ok(())
    }

    /// Loads whichever of the words table and the char table exist in `dir`.
    pub fn load<P: AsRef<Path>>(dir: P) -> anyhow::Result<Self> {
        let dir = dir.as_ref();
        let mut dict = Self::default();

        let words_path = dir.join(WORDS_DICT_FILE);
        if words_path.exists() {
            let content = fs::read_to_string(&words_path)
                .with_context(|| format!("read {}", words_path.display()))?;
            dict.extend_rime_str(&content);
        }
        let chars_path = dir.join(CHAR_TABLE_FILE);
        if chars_path.exists() {
            let content = fs::read_to_string(&chars_path)
                .with_context(|| format!("read {}", chars_path.display()))?;
            dict.extend_char_table_json(&content)
                .map_err(|e| anyhow::anyhow!("parse {}: {}", chars_path.display(), e))?;
        }
        info!(
            "loaded jyutping dict from {}: {} chars, {} words",
            dir.display(),
            dict.chars.len(),
            dict.words.len()
        );
        Ok(dict)
    }

    pub fn char_count(&self) -> usize {
        self.chars.len()
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// Pairs every character of `text` with its syllable, preferring the
    /// longest dictionary word that starts at each position.
    pub fn get_jyutping_list(&self, text: &str) -> Result<Vec<(char, String)>> {
        let chars: Vec<char> = text.chars().collect();
        let mut res = Vec::with_capacity(chars.len());
        let mut i = 0;

        while i < chars.len() {
            let longest = self.max_word_len.min(chars.len() - i);
            let matched = (2..=longest).rev().find_map(|len| {
                let slice: String = chars[i..i + len].iter().collect();
                self.words.get(&slice).map(|syllables| (len, syllables))
            });

            if let Some((len, syllables)) = matched {
                debug!("use dict: {:?}: {:?}", &chars[i..i + len], syllables);
                res.extend(chars[i..i + len].iter().copied().zip(syllables.iter().cloned()));
                i += len;
                continue;
            }

            let c = chars[i];
            if is_punctuation_char(c) {
                res.push((c, c.to_string()));
            } else {
                let syllable = self
                    .chars
                    .get(&c)
                    .ok_or_else(|| G2pError::UnparsableSyllable(c.to_string()))?;
                res.push((c, syllable.clone()));
            }
            i += 1;
        }

        Ok(res)
    }
}

impl Romanizer for JyutpingDict {
    fn romanize(&self, word: &str) -> Result<Vec<String>> {
        Ok(self
            .get_jyutping_list(word)?
            .into_iter()
            .map(|(_, syllable)| syllable)
            .collect())
    }
}
