// text/en/g2p_en.rs
use arpabet::Arpabet;
use log::debug;

use crate::error::Result;

/// Out-of-dictionary fallback: raw ARPAbet-style phones for one word.
pub trait PhonemePredictor {
    fn predict(&mut self, word: &str) -> Result<Vec<String>>;
}

/// Looks words up in the CMUdict bundled with the `arpabet` crate and spells
/// out unknown words letter by letter.
pub struct ArpabetPredictor {
    arpabet: Arpabet,
}

impl Default for ArpabetPredictor {
    fn default() -> Self {
        Self::new()
    }
}

impl ArpabetPredictor {
    pub fn new() -> Self {
        Self {
            arpabet: arpabet::load_cmudict().clone(),
        }
    }

    fn lookup(&self, word: &str) -> Option<Vec<String>> {
        [word.to_lowercase(), word.to_uppercase()]
            .iter()
            .find_map(|w| self.arpabet.get_polyphone_str(w))
            .map(|phones| phones.iter().map(|&p| p.to_string()).collect())
    }
}

impl PhonemePredictor for ArpabetPredictor {
    fn predict(&mut self, word: &str) -> Result<Vec<String>> {
        if let Some(phones) = self.lookup(word) {
            return Ok(phones);
        }
        debug!("{:?} not in arpabet, spelling it out", word);
        let mut phonemes = Vec::new();
        for c in word.chars() {
            let c_str = c.to_string();
            match self.lookup(&c_str) {
                Some(phones) => phonemes.extend(phones),
                None => phonemes.push(c_str),
            }
        }
        Ok(phonemes)
    }
}

#[cfg(feature = "onnx")]
pub use neural::NeuralG2p;

#[cfg(feature = "onnx")]
mod neural {
    use std::path::Path;

    use anyhow::Context;
    use log::debug;
    use ndarray::{Array, s};
    use ort::{inputs, session::Session, value::Tensor};
    use tokenizers::Tokenizer;

    use super::PhonemePredictor;
    use crate::{error::Result, onnx_builder::create_onnx_cpu_session};

    const DECODER_START_TOKEN_ID: i64 = 2;
    const EOS_TOKEN_ID: i64 = 2;
    const MAX_DECODE_STEPS: usize = 50;

    /// Mini-BART grapheme-to-phoneme model: `encoder_model.onnx`,
    /// `decoder_model.onnx` and `tokenizer.json` in one directory, decoded greedily.
    pub struct NeuralG2p {
        encoder_model: Session,
        decoder_model: Session,
        tokenizer: Tokenizer,
    }

    impl NeuralG2p {
        pub fn new<P: AsRef<Path>>(model_dir: P) -> anyhow::Result<Self> {
            let dir = model_dir.as_ref();
            let encoder_model = create_onnx_cpu_session(dir.join("encoder_model.onnx"))?;
            let decoder_model = create_onnx_cpu_session(dir.join("decoder_model.onnx"))?;
            let tokenizer_path = dir.join("tokenizer.json");
            let tokenizer = Tokenizer::from_file(&tokenizer_path)
                .map_err(|e| anyhow::anyhow!("load g2p tokenizer error: {}", e))
                .with_context(|| format!("read {}", tokenizer_path.display()))?;

            Ok(Self {
                encoder_model,
                decoder_model,
                tokenizer,
            })
        }

        fn infer(&mut self, word: &str) -> anyhow::Result<Vec<String>> {
            let encoding = self
                .tokenizer
                .encode(word, true)
                .map_err(|e| anyhow::anyhow!("encode error: {}", e))?;
            let input_ids: Vec<i64> = encoding.get_ids().iter().map(|x| *x as i64).collect();
            let len = input_ids.len();

            let input_ids_tensor = Tensor::from_array(Array::from_shape_vec((1, len), input_ids)?)?;
            let attention_mask_tensor = Tensor::from_array(Array::from_elem((1, len), 1i64))?;
            let encoder_outputs = self.encoder_model.run(inputs![
                "input_ids" => input_ids_tensor,
                "attention_mask" => attention_mask_tensor.clone()
            ])?;
            let hidden = encoder_outputs["last_hidden_state"]
                .try_extract_array::<f32>()?
                .to_owned();
            let hidden_tensor = Tensor::from_array(hidden)?;

            let mut decoder_input_ids = vec![DECODER_START_TOKEN_ID];
            for _ in 0..MAX_DECODE_STEPS {
                let decoder_input_ids_tensor = Tensor::from_array(Array::from_shape_vec(
                    (1, decoder_input_ids.len()),
                    decoder_input_ids.clone(),
                )?)?;
                let outputs = self.decoder_model.run(inputs![
                    "input_ids" => decoder_input_ids_tensor,
                    "encoder_attention_mask" => attention_mask_tensor.clone(),
                    "encoder_hidden_states" => hidden_tensor.clone(),
                ])?;

                let logits = outputs["logits"].try_extract_array::<f32>()?;
                let last = logits.slice(s![0, logits.shape()[1] - 1, ..]);
                let next_token_id = last
                    .iter()
                    .enumerate()
                    .max_by(|(_, a), (_, b)| a.total_cmp(b))
                    .map(|(i, _)| i as i64)
                    .ok_or_else(|| anyhow::anyhow!("failed to compute argmax"))?;

                decoder_input_ids.push(next_token_id);
                if next_token_id == EOS_TOKEN_ID {
                    break;
                }
            }

            let ids: Vec<u32> = decoder_input_ids.iter().map(|x| *x as u32).collect();
            let decoded = self
                .tokenizer
                .decode(&ids, true)
                .map_err(|e| anyhow::anyhow!("g2p decode error: {}", e))?;
            debug!("neural g2p {:?} -> {:?}", word, decoded);
            Ok(decoded.split(' ').map(str::to_owned).collect())
        }
    }

    impl PhonemePredictor for NeuralG2p {
        fn predict(&mut self, word: &str) -> Result<Vec<String>> {
            Ok(self.infer(word)?)
        }
    }
}
