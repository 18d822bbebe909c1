use std::collections::{BTreeSet, HashMap};

use once_cell::sync::Lazy;

use crate::{
    error::{G2pError, Result},
    text::{en::ENGLISH_SYMBOLS, yue::jyutping::CANTONESE_SYMBOLS, zh::pinyin::MANDARIN_SYMBOLS},
};

pub const PAD: &str = "_";
/// Utterance-start pad used by the multilingual merger.
pub const START_PAD: &str = "-";
pub const SP: &str = "SP";
pub const UNK: &str = "UNK";
pub const PUNCTUATIONS: [&str; 7] = ["!", "?", "…", ",", ".", "'", "-"];

/// Process-wide vocabulary, built on first use.
pub static SYMBOLS: Lazy<SymbolTable> = Lazy::new(SymbolTable::build);

/// `[pad, SP, UNK, punctuation..]` followed by the sorted union of the
/// Cantonese, Mandarin and English inventories. The order is a contract:
/// ids are positions in this list and are baked into trained models.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolTable {
    symbols: Vec<&'static str>,
    ids: HashMap<&'static str, i64>,
}

impl SymbolTable {
    pub fn build() -> Self {
        // BTreeSet orders by bytes, which for UTF-8 is code point order.
        let inventory: BTreeSet<&'static str> = CANTONESE_SYMBOLS
            .iter()
            .chain(MANDARIN_SYMBOLS.iter())
            .chain(ENGLISH_SYMBOLS.iter())
            .copied()
            .collect();

        let mut symbols = Vec::with_capacity(inventory.len() + PUNCTUATIONS.len() + 3);
        symbols.push(PAD);
        symbols.push(SP);
        symbols.push(UNK);
        symbols.extend(PUNCTUATIONS);
        for s in inventory {
            if !symbols.contains(&s) {
                symbols.push(s);
            }
        }

        let ids = symbols
            .iter()
            .enumerate()
            .map(|(i, s)| (*s, i as i64))
            .collect();
        Self { symbols, ids }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn symbols(&self) -> &[&'static str] {
        &self.symbols
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.ids.contains_key(symbol)
    }

    pub fn id(&self, symbol: &str) -> Option<i64> {
        self.ids.get(symbol).copied()
    }

    pub fn symbol(&self, id: i64) -> Option<&'static str> {
        usize::try_from(id)
            .ok()
            .and_then(|i| self.symbols.get(i))
            .copied()
    }

    pub fn encode<S: AsRef<str>>(&self, phones: &[S]) -> Result<Vec<i64>> {
        phones
            .iter()
            .map(|p| {
                let p = p.as_ref();
                self.id(p)
                    .ok_or_else(|| G2pError::UnknownSymbol(p.to_owned()))
            })
            .collect()
    }

    pub fn decode(&self, ids: &[i64]) -> Result<Vec<&'static str>> {
        ids.iter()
            .map(|&id| self.symbol(id).ok_or(G2pError::UnknownSymbolId(id)))
            .collect()
    }

    pub fn sequence_to_text(&self, ids: &[i64]) -> Result<String> {
        Ok(self.decode(ids)?.concat())
    }
}
