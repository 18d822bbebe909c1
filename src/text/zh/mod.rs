// text/zh/mod.rs
use crate::{
    error::Result,
    text::{
        G2p, G2pOutput, Romanizer, SyllablePosition, WordPosition, align_syllables,
        word_position_labels,
    },
};

pub mod pinyin;

pub use self::pinyin::PinyinRomanizer;
use self::pinyin::{PinyinSyllable, parse_pinyin};

pub const LANG_ID: i32 = 1;

/// Mandarin G2P: pinyin syllables split into initial and final. Finals take
/// syllable position 3, so there is no nucleus slot.
pub struct MandarinG2p {
    romanizer: Box<dyn Romanizer + Send + Sync>,
}

impl Default for MandarinG2p {
    fn default() -> Self {
        Self::new(PinyinRomanizer)
    }
}

impl MandarinG2p {
    pub fn new<R: Romanizer + Send + Sync + 'static>(romanizer: R) -> Self {
        Self {
            romanizer: Box::new(romanizer),
        }
    }

    fn push_syllable(out: &mut G2pOutput, syllable: &str, word_pos: WordPosition) -> Result<i32> {
        match parse_pinyin(syllable)? {
            PinyinSyllable::Punctuation(p) => {
                out.push_phone(p, 0, word_pos, SyllablePosition::None, LANG_ID);
                Ok(1)
            }
            PinyinSyllable::Syllable {
                initial,
                r#final,
                tone,
            } => {
                let mut count = 1;
                if !initial.is_empty() {
                    out.push_phone(initial, tone, word_pos, SyllablePosition::Onset, LANG_ID);
                    count += 1;
                }
                out.push_phone(r#final, tone, word_pos, SyllablePosition::Coda, LANG_ID);
                Ok(count)
            }
        }
    }
}

impl G2p for MandarinG2p {
    fn g2p(&mut self, text: &str, pinyin: Option<&str>, padding: bool) -> Result<G2pOutput> {
        let mut out = G2pOutput::default();
        for (_, syllables) in align_syllables(text, pinyin, self.romanizer.as_ref())? {
            let labels = word_position_labels(syllables.len());
            for (syllable, label) in syllables.iter().zip(labels) {
                let count = Self::push_syllable(&mut out, syllable, label)?;
                out.word2ph.push(count);
            }
        }

        if padding {
            out.pad_default(LANG_ID);
        }
        out.log("zh");
        debug_assert!(out.is_aligned());
        Ok(out)
    }
}
