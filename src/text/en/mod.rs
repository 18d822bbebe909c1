// text/en/mod.rs
use std::{collections::HashSet, sync::Arc};

use crate::{
    error::{G2pError, Result},
    phoneme::{conversion::post_replace_ph, detection::is_punctuation},
    text::{G2p, G2pOutput, SyllablePosition, WordPosition},
};

pub mod dict;
pub mod g2p_en;
pub mod tokenizer;

pub use dict::EnglishDict;
#[cfg(feature = "onnx")]
pub use g2p_en::NeuralG2p;
pub use g2p_en::{ArpabetPredictor, PhonemePredictor};
pub use tokenizer::{HfTokenizer, SimpleTokenizer, SubwordTokenizer, WORD_START};

pub const LANG_ID: i32 = 2;

pub const ENGLISH_SYMBOLS: [&str; 39] = [
    "aa", "ae", "ah", "ao", "aw", "ay", "b", "ch", "d", "dh", "eh", "er", "ey", "f", "g", "hh", "ih",
    "iy", "jh", "k", "l", "m", "n", "ng", "ow", "oy", "p", "r", "s", "sh", "t", "th", "uh", "uw",
    "V", "w", "y", "z", "zh",
];

lazy_static::lazy_static! {
    /// Raw phones the predictor may emit that carry tone information.
    static ref ARPA: HashSet<&'static str> = [
        "AH0", "S", "AH1", "EY2", "AE2", "EH0", "OW2", "UH0", "NG", "B", "G", "AY0", "M", "AA0",
        "F", "AO0", "ER2", "UH1", "IY1", "AH2", "DH", "IY0", "EY1", "IH0", "K", "N", "W", "IY2",
        "T", "AA1", "ER1", "EH2", "OY0", "UH2", "UW1", "Z", "AW2", "AW1", "V", "UW2", "AA2", "ER",
        "AW0", "UW0", "R", "OW1", "EH1", "ZH", "AE0", "IH2", "IH", "Y", "JH", "P", "AY1", "EY0",
        "OY2", "TH", "HH", "D", "ER0", "CH", "AO1", "AE1", "AO2", "OY1", "AY2", "IH1", "OW0", "L",
        "SH",
    ]
    .into_iter()
    .collect();
}

/// Lowercases a raw phone and derives its tone: stress digit + 1, or 3 when
/// the phone has no stress digit.
pub fn refine_ph(ph: &str) -> (String, i32) {
    match ph.chars().last().and_then(|c| c.to_digit(10)) {
        Some(d) => (ph[..ph.len() - 1].to_lowercase(), d as i32 + 1),
        None => (ph.to_lowercase(), 3),
    }
}

/// Spreads `n_phone` phones over `n_word` buckets, each phone going to the
/// first bucket with the fewest phones.
pub fn distribute_phone(n_phone: usize, n_word: usize) -> Vec<i32> {
    let mut phones_per_word = vec![0; n_word];
    for _ in 0..n_phone {
        let Some(min_index) = (0..n_word).min_by_key(|&i| (phones_per_word[i], i)) else {
            break;
        };
        phones_per_word[min_index] += 1;
    }
    phones_per_word
}

/// Groups subword pieces into word units. A piece carrying [`WORD_START`]
/// opens a unit; a punctuation piece joins the previous unit only when the
/// next piece continues a word.
pub fn group_subwords<S: AsRef<str>>(tokens: &[S]) -> Vec<Vec<String>> {
    let mut words: Vec<Vec<String>> = Vec::new();
    for (idx, t) in tokens.iter().enumerate() {
        let t = t.as_ref();
        if let Some(rest) = t.strip_prefix(WORD_START) {
            words.push(vec![rest.to_owned()]);
            continue;
        }
        let attaches = if is_punctuation(t) {
            tokens.get(idx + 1).is_some_and(|next| {
                let next = next.as_ref();
                !next.starts_with(WORD_START) && !is_punctuation(next)
            })
        } else {
            true
        };
        match words.last_mut() {
            Some(last) if attaches => last.push(t.to_owned()),
            _ => words.push(vec![t.to_owned()]),
        }
    }
    words
}

/// English G2P: dictionary lookup with a predictor fallback, subword-aligned
/// `word2ph`.
pub struct EnglishG2p {
    dict: Arc<EnglishDict>,
    tokenizer: Box<dyn SubwordTokenizer + Send + Sync>,
    predictor: Box<dyn PhonemePredictor + Send>,
}

impl EnglishG2p {
    pub fn new<T, P>(dict: Arc<EnglishDict>, tokenizer: T, predictor: P) -> Self
    where
        T: SubwordTokenizer + Send + Sync + 'static,
        P: PhonemePredictor + Send + 'static,
    {
        Self::from_parts(dict, Box::new(tokenizer), Box::new(predictor))
    }

    pub fn from_parts(
        dict: Arc<EnglishDict>,
        tokenizer: Box<dyn SubwordTokenizer + Send + Sync>,
        predictor: Box<dyn PhonemePredictor + Send>,
    ) -> Self {
        Self {
            dict,
            tokenizer,
            predictor,
        }
    }

    fn word_phones(
        &mut self,
        w: &str,
        phones: &mut Vec<String>,
        tones: &mut Vec<i32>,
    ) -> Result<()> {
        if is_punctuation(w) {
            phones.push(w.to_owned());
            tones.push(0);
            return Ok(());
        }
        if let Some(syllables) = self.dict.get(w) {
            for ph in syllables.iter().flatten() {
                let (ph, tone) = refine_ph(ph);
                phones.push(post_replace_ph(&ph));
                tones.push(tone);
            }
            return Ok(());
        }
        if w.is_empty() {
            return Ok(());
        }
        for ph in self.predictor.predict(w)? {
            if ph.trim().is_empty() {
                continue;
            }
            let (ph, tone) = if ARPA.contains(ph.as_str()) {
                refine_ph(&ph)
            } else {
                (ph, 0)
            };
            phones.push(post_replace_ph(&ph));
            tones.push(tone);
        }
        Ok(())
    }
}

impl G2p for EnglishG2p {
    fn g2p(&mut self, text: &str, phoneme: Option<&str>, padding: bool) -> Result<G2pOutput> {
        if phoneme.is_some() {
            return Err(G2pError::NotImplemented("phoneme input for English"));
        }

        let tokens = self.tokenizer.tokenize(text)?;
        let words = group_subwords(&tokens);
        let mut out = G2pOutput::default();

        for word in &words {
            let lookups = if word.len() > 1 && word.iter().any(|w| w == "'") {
                vec![word.concat()]
            } else {
                word.clone()
            };

            let mut phones = Vec::new();
            let mut tones = Vec::new();
            for w in &lookups {
                self.word_phones(w, &mut phones, &mut tones)?;
            }

            let n = phones.len();
            let single_punct = n == 1 && is_punctuation(&phones[0]);
            for (j, (ph, tone)) in phones.into_iter().zip(tones).enumerate() {
                let pos = if single_punct {
                    SyllablePosition::None
                } else if j == 0 {
                    SyllablePosition::Onset
                } else if j == n - 1 {
                    SyllablePosition::Coda
                } else {
                    SyllablePosition::Nucleus
                };
                out.push_phone(ph, tone, WordPosition::Begin, pos, LANG_ID);
            }
            out.word2ph.extend(distribute_phone(n, word.len()));
        }

        if padding {
            out.pad_default(LANG_ID);
        }
        out.log("en");
        debug_assert!(out.is_aligned());
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phoneme::{SYMBOLS, UNK};

    struct FakePredictor(Vec<&'static str>);

    impl PhonemePredictor for FakePredictor {
        fn predict(&mut self, _word: &str) -> Result<Vec<String>> {
            Ok(self.0.iter().map(|p| p.to_string()).collect())
        }
    }

    fn syl(phones: &[&str]) -> Vec<String> {
        phones.iter().map(|p| p.to_string()).collect()
    }

    fn g2p(prediction: Vec<&'static str>) -> EnglishG2p {
        let dict = EnglishDict::from_entries([
            ("hello", vec![syl(&["HH", "AH0"]), syl(&["L", "OW1"])]),
            ("world", vec![syl(&["W", "ER1", "L", "D"])]),
            ("don't", vec![syl(&["D", "OW1", "N", "T"])]),
            ("gan", vec![syl(&["G", "AE1", "N"])]),
            ("based", vec![syl(&["B", "EY1", "S", "T"])]),
        ]);
        EnglishG2p::new(Arc::new(dict), SimpleTokenizer, FakePredictor(prediction))
    }

    #[test]
    fn test_refine_ph() {
        assert_eq!(refine_ph("AH0"), ("ah".to_string(), 1));
        assert_eq!(refine_ph("OW2"), ("ow".to_string(), 3));
        assert_eq!(refine_ph("ER"), ("er".to_string(), 3));
    }

    #[test]
    fn test_distribute_phone() {
        assert_eq!(distribute_phone(5, 2), vec![3, 2]);
        assert_eq!(distribute_phone(2, 3), vec![1, 1, 0]);
        assert_eq!(distribute_phone(4, 1), vec![4]);
        assert_eq!(distribute_phone(0, 2), vec![0, 0]);
    }

    #[test]
    fn test_group_subwords() {
        let tokens = ["▁Hello", ",", "▁don", "'", "t", "▁GAN", "-", "based", "."];
        assert_eq!(
            group_subwords(&tokens),
            vec![
                vec!["Hello"],
                vec![","],
                vec!["don", "'", "t"],
                vec!["GAN", "-", "based"],
                vec!["."],
            ]
        );
        // a leading continuation piece opens its own unit
        assert_eq!(group_subwords(&["ab", "▁c"]), vec![vec!["ab"], vec!["c"]]);
    }

    #[test]
    fn test_dictionary_words() {
        let out = g2p(vec![]).g2p("Hello world.", None, true).unwrap();
        assert_eq!(
            out.phones,
            vec!["_", "hh", "ah", "l", "ow", "w", "er", "l", "d", ".", "_"]
        );
        assert_eq!(out.tones, vec![0, 3, 1, 3, 2, 3, 2, 3, 3, 0, 0]);
        assert_eq!(out.word2ph, vec![1, 4, 4, 1, 1]);
        assert_eq!(out.word_pos, vec![0, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0]);
        assert_eq!(out.syllable_pos, vec![0, 1, 2, 2, 3, 1, 2, 2, 3, 0, 0]);
        assert_eq!(out.lang_ids, vec![2; 11]);
        assert!(out.is_aligned());
    }

    #[test]
    fn test_contraction_is_joined_for_lookup() {
        let out = g2p(vec![]).g2p("don't", None, false).unwrap();
        assert_eq!(out.phones, vec!["d", "ow", "n", "t"]);
        // four phones spread over the three original pieces
        assert_eq!(out.word2ph, vec![2, 1, 1]);
    }

    #[test]
    fn test_hyphenated_pieces_looked_up_separately() {
        let out = g2p(vec![]).g2p("GAN-based", None, false).unwrap();
        assert_eq!(out.phones, vec!["g", "ae", "n", "-", "b", "ey", "s", "t"]);
        assert_eq!(out.tones, vec![3, 2, 3, 0, 3, 2, 3, 3]);
        assert_eq!(out.word2ph, vec![3, 3, 2]);
        assert!(out.is_aligned());
    }

    #[test]
    fn test_out_of_dictionary_word_uses_predictor() {
        let out = g2p(vec!["D", "IY1", " ", "EH1", "S", "AA", "@"])
            .g2p("DSPGAN", None, true)
            .unwrap();
        assert_eq!(out.phones, vec!["_", "d", "iy", "eh", "s", UNK, UNK, "_"]);
        assert_eq!(out.tones, vec![0, 3, 2, 2, 3, 0, 0, 0]);
        assert_eq!(out.word2ph, vec![1, 6, 1]);
        assert!(out.is_aligned());
        assert!(out.phones.iter().all(|p| SYMBOLS.contains(p)));
    }

    #[test]
    fn test_predicted_lowercase_v_is_canonicalized() {
        let out = g2p(vec!["v", "IY1"]).g2p("vee", None, false).unwrap();
        assert_eq!(out.phones, vec!["V", "iy"]);
        assert_eq!(out.tones, vec![0, 2]);
    }

    #[test]
    fn test_phoneme_input_not_implemented() {
        assert!(matches!(
            g2p(vec![]).g2p("hello", Some("HH AH0"), true),
            Err(G2pError::NotImplemented(_))
        ));
    }
}
