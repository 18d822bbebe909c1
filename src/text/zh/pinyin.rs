use once_cell::sync::Lazy;
use ::pinyin::ToPinyin;
use regex::Regex;

use crate::{
    error::{G2pError, Result},
    phoneme::detection::is_cjk,
    text::Romanizer,
};

/// Initials in the non-strict sense: `y` and `w` count as initials.
pub const INITIALS: [&str; 23] = [
    "b", "p", "m", "f", "d", "t", "n", "l", "g", "k", "h", "j", "q", "x", "zh", "ch", "sh", "r",
    "z", "c", "s", "y", "w",
];

pub const FINALS: [&str; 39] = [
    "a", "ai", "an", "ang", "ao", "e", "ei", "en", "eng", "er", "i", "ia", "ian", "iang", "iao",
    "ie", "in", "ing", "iong", "iu", "o", "ong", "ou", "u", "ua", "uai", "uan", "uang", "ue", "ui",
    "un", "uo", "v", "van", "ve", "vn", "n", "ng", "m",
];

/// Union of initials and finals.
pub const MANDARIN_SYMBOLS: [&str; 60] = [
    "a", "ai", "an", "ang", "ao", "b", "c", "ch", "d", "e", "ei", "en", "eng", "er", "f", "g", "h",
    "i", "ia", "ian", "iang", "iao", "ie", "in", "ing", "iong", "iu", "j", "k", "l", "m", "n", "ng",
    "o", "ong", "ou", "p", "q", "r", "s", "sh", "t", "u", "ua", "uai", "uan", "uang", "ue", "ui",
    "un", "uo", "v", "van", "ve", "vn", "w", "x", "y", "z", "zh",
];

static SYLLABLE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([a-z]+)([0-5]?)$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PinyinSyllable {
    Punctuation(String),
    Syllable {
        initial: String,
        r#final: String,
        tone: i32,
    },
}

/// Splits a pinyin syllable such as `zhong1` into initial, final and tone.
/// A token without any letter is taken as punctuation.
pub fn parse_pinyin(syllable: &str) -> Result<PinyinSyllable> {
    if !syllable.chars().any(char::is_alphabetic) {
        return Ok(PinyinSyllable::Punctuation(syllable.to_owned()));
    }

    let normalized = syllable.to_lowercase().replace('ü', "v");
    let caps = SYLLABLE_RE
        .captures(&normalized)
        .ok_or_else(|| G2pError::UnparsableSyllable(syllable.to_owned()))?;
    let body = &caps[1];
    let tone = caps[2].parse::<i32>().unwrap_or(0);

    let initial = match body {
        "m" | "n" | "ng" => "",
        _ => INITIALS
            .iter()
            .filter(|i| body.starts_with(**i) && body.len() > i.len())
            .max_by_key(|i| i.len())
            .copied()
            .unwrap_or(""),
    };
    let r#final = &body[initial.len()..];
    if !FINALS.contains(&r#final) {
        return Err(G2pError::UnparsableSyllable(syllable.to_owned()));
    }

    Ok(PinyinSyllable::Syllable {
        initial: initial.to_owned(),
        r#final: r#final.to_owned(),
        tone,
    })
}

/// Character-level pinyin lookup backed by the `pinyin` crate, first reading only.
#[derive(Debug, Default, Clone, Copy)]
pub struct PinyinRomanizer;

impl Romanizer for PinyinRomanizer {
    fn romanize(&self, word: &str) -> Result<Vec<String>> {
        word.chars()
            .map(|c| match c.to_pinyin() {
                Some(p) => Ok(p.with_tone_num_end().replace('ü', "v")),
                None if is_cjk(c) => Err(G2pError::UnparsableSyllable(c.to_string())),
                None => Ok(c.to_string()),
            })
            .collect()
    }
}
