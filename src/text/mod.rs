// text/mod.rs
use log::debug;
use serde::Serialize;

use crate::{
    error::{G2pError, Result},
    phoneme::PAD,
};

pub mod en;
pub mod multilingual;
pub mod normalize;
pub mod yue;
pub mod zh;

/// Position of a phone inside its orthographic word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum WordPosition {
    None = 0,
    Begin = 1,
    Middle = 2,
    End = 3,
}

/// Position of a phone inside its syllable. Cantonese numbers the parts that
/// are present, so the first one is always `Onset`. Mandarin finals and
/// English word-final phones reuse `Coda`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum SyllablePosition {
    None = 0,
    Onset = 1,
    Nucleus = 2,
    Coda = 3,
}

/// Labels for each character of a word of `len` characters:
/// `[B]`, `[B, E]`, `[B, M, .., M, E]`.
pub fn word_position_labels(len: usize) -> Vec<WordPosition> {
    match len {
        0 => vec![],
        1 => vec![WordPosition::Begin],
        n => {
            let mut labels = Vec::with_capacity(n);
            labels.push(WordPosition::Begin);
            labels.extend(std::iter::repeat_n(WordPosition::Middle, n - 2));
            labels.push(WordPosition::End);
            labels
        }
    }
}

/// Aligned phone-level features produced by every G2P.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct G2pOutput {
    pub phones: Vec<String>,
    pub tones: Vec<i32>,
    pub word2ph: Vec<i32>,
    pub word_pos: Vec<i32>,
    pub syllable_pos: Vec<i32>,
    pub lang_ids: Vec<i32>,
}

impl G2pOutput {
    pub fn len(&self) -> usize {
        self.phones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phones.is_empty()
    }

    /// Appends one phone. `word2ph` is not touched; callers account for the
    /// phone in the count of the unit it belongs to.
    pub fn push_phone(
        &mut self,
        phone: impl Into<String>,
        tone: i32,
        word_pos: WordPosition,
        syllable_pos: SyllablePosition,
        lang_id: i32,
    ) {
        self.phones.push(phone.into());
        self.tones.push(tone);
        self.word_pos.push(word_pos as i32);
        self.syllable_pos.push(syllable_pos as i32);
        self.lang_ids.push(lang_id);
    }

    pub fn extend(&mut self, other: G2pOutput) {
        self.phones.extend(other.phones);
        self.tones.extend(other.tones);
        self.word2ph.extend(other.word2ph);
        self.word_pos.extend(other.word_pos);
        self.syllable_pos.extend(other.syllable_pos);
        self.lang_ids.extend(other.lang_ids);
    }

    /// Surrounds every array with one pad entry on each side. Pads carry
    /// tone and positions 0, and count as one phone in `word2ph`.
    pub fn pad(&mut self, start: &str, end: &str, lang_id: i32) {
        self.phones.insert(0, start.to_owned());
        self.phones.push(end.to_owned());
        for v in [&mut self.tones, &mut self.word_pos, &mut self.syllable_pos] {
            v.insert(0, 0);
            v.push(0);
        }
        self.lang_ids.insert(0, lang_id);
        self.lang_ids.push(lang_id);
        self.word2ph.insert(0, 1);
        self.word2ph.push(1);
    }

    pub fn pad_default(&mut self, lang_id: i32) {
        self.pad(PAD, PAD, lang_id);
    }

    pub fn is_aligned(&self) -> bool {
        let n = self.phones.len();
        self.tones.len() == n
            && self.word_pos.len() == n
            && self.syllable_pos.len() == n
            && self.lang_ids.len() == n
            && self.word2ph.iter().map(|&c| c as usize).sum::<usize>() == n
    }

    fn log(&self, who: &str) {
        debug!("{} phones: {:?}", who, self.phones);
        debug!("{} tones: {:?}", who, self.tones);
        debug!("{} word2ph: {:?}", who, self.word2ph);
    }
}

/// A per-language grapheme-to-phoneme strategy.
pub trait G2p {
    /// `phoneme` is an optional externally supplied transcription, e.g. a
    /// space separated jyutping or pinyin string with one syllable per character.
    fn g2p(&mut self, text: &str, phoneme: Option<&str>, padding: bool) -> Result<G2pOutput>;
}

/// Turns a word into one romanized syllable per character.
/// Punctuation characters come back unchanged.
pub trait Romanizer {
    fn romanize(&self, word: &str) -> Result<Vec<String>>;
}

/// Splits `text` on whitespace and pairs each word with its syllables, either
/// from `romanizer` or by partitioning a supplied transcription by character count.
pub(crate) fn align_syllables<'t>(
    text: &'t str,
    transcription: Option<&str>,
    romanizer: &dyn Romanizer,
) -> Result<Vec<(&'t str, Vec<String>)>> {
    let words: Vec<&str> = text.split_whitespace().collect();
    match transcription {
        None => words
            .into_iter()
            .map(|word| {
                let syllables = romanizer.romanize(word)?;
                let expected = word.chars().count();
                if syllables.len() != expected {
                    return Err(G2pError::MisalignedTranscription {
                        expected,
                        actual: syllables.len(),
                    });
                }
                Ok((word, syllables))
            })
            .collect(),
        Some(transcription) => {
            let syllables: Vec<&str> = transcription.split_whitespace().collect();
            let expected: usize = words.iter().map(|w| w.chars().count()).sum();
            if syllables.len() != expected {
                return Err(G2pError::MisalignedTranscription {
                    expected,
                    actual: syllables.len(),
                });
            }
            let mut rest = syllables.as_slice();
            let mut pairs = Vec::with_capacity(words.len());
            for word in words {
                let (head, tail) = rest.split_at(word.chars().count());
                pairs.push((word, head.iter().map(|s| s.to_string()).collect()));
                rest = tail;
            }
            Ok(pairs)
        }
    }
}
