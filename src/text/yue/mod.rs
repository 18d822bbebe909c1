// text/yue/mod.rs
use crate::{
    error::Result,
    phoneme::detection::is_punctuation,
    text::{
        G2p, G2pOutput, Romanizer, SyllablePosition, WordPosition, align_syllables,
        word_position_labels,
    },
};

pub mod dict;
pub mod jyutping;

pub use dict::JyutpingDict;
use jyutping::parse_jyutping;

pub const LANG_ID: i32 = 0;

/// Cantonese G2P: jyutping syllables split into onset, nucleus and coda.
pub struct CantoneseG2p {
    romanizer: Box<dyn Romanizer + Send + Sync>,
}

impl CantoneseG2p {
    pub fn new<R: Romanizer + Send + Sync + 'static>(romanizer: R) -> Self {
        Self {
            romanizer: Box::new(romanizer),
        }
    }

    /// Emits the phones of one syllable and returns how many were added.
    fn push_syllable(out: &mut G2pOutput, syllable: &str, word_pos: WordPosition) -> Result<i32> {
        if is_punctuation(syllable) {
            out.push_phone(syllable, 0, word_pos, SyllablePosition::None, LANG_ID);
            return Ok(1);
        }
        let parsed = parse_jyutping(syllable)?;
        let phones = parsed.phones();
        for (phone, pos) in &phones {
            out.push_phone(*phone, parsed.tone, word_pos, *pos, LANG_ID);
        }
        Ok(phones.len() as i32)
    }
}

impl G2p for CantoneseG2p {
    fn g2p(&mut self, text: &str, jyutping: Option<&str>, padding: bool) -> Result<G2pOutput> {
        let mut out = G2pOutput::default();
        for (_, syllables) in align_syllables(text, jyutping, self.romanizer.as_ref())? {
            let labels = word_position_labels(syllables.len());
            for (syllable, label) in syllables.iter().zip(labels) {
                let count = Self::push_syllable(&mut out, syllable, label)?;
                out.word2ph.push(count);
            }
        }

        if padding {
            out.pad_default(LANG_ID);
        }
        out.log("yue");
        debug_assert!(out.is_aligned());
        Ok(out)
    }
}
