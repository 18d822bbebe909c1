use smallvec::SmallVec;

use crate::{
    error::{G2pError, Result},
    text::SyllablePosition,
};

pub const ONSETS: [&str; 19] = [
    "b", "d", "g", "gw", "z", "p", "t", "k", "kw", "c", "m", "n", "ng", "f", "h", "s", "l", "w",
    "j",
];
pub const NUCLEI: [&str; 12] = ["aa", "a", "i", "yu", "u", "oe", "e", "eo", "o", "m", "n", "ng"];
pub const CODAS: [&str; 8] = ["p", "t", "k", "m", "n", "ng", "i", "u"];

/// Union of onsets, nuclei and codas.
pub const CANTONESE_SYMBOLS: [&str; 28] = [
    "a", "aa", "b", "c", "d", "e", "eo", "f", "g", "gw", "h", "i", "j", "k", "kw", "l", "m", "n",
    "ng", "o", "oe", "p", "s", "t", "u", "w", "yu", "z",
];

/// A jyutping syllable split into its parts. Absent parts are empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JyutpingSyllable<'a> {
    pub onset: &'a str,
    pub nucleus: &'a str,
    pub coda: &'a str,
    pub tone: i32,
}

impl<'a> JyutpingSyllable<'a> {
    /// Present parts in order, numbered 1, 2, 3 from the first present part.
    /// An onset-less `aa1` is labelled 1, not 2.
    pub fn phones(&self) -> SmallVec<[(&'a str, SyllablePosition); 3]> {
        const ORDER: [SyllablePosition; 3] = [
            SyllablePosition::Onset,
            SyllablePosition::Nucleus,
            SyllablePosition::Coda,
        ];
        [self.onset, self.nucleus, self.coda]
            .into_iter()
            .filter(|p| !p.is_empty())
            .zip(ORDER)
            .collect()
    }
}

fn longest_prefix(s: &str, table: &[&'static str]) -> Option<&'static str> {
    table
        .iter()
        .filter(|p| s.starts_with(**p) && s.len() > p.len())
        .max_by_key(|p| p.len())
        .copied()
}

fn longest_suffix(s: &str, table: &[&'static str]) -> Option<&'static str> {
    table
        .iter()
        .filter(|p| s.ends_with(**p) && s.len() > p.len())
        .max_by_key(|p| p.len())
        .copied()
}

/// Parses a toned jyutping syllable such as `gwong2` or `ng5`.
pub fn parse_jyutping(syllable: &str) -> Result<JyutpingSyllable<'_>> {
    let err = || G2pError::UnparsableSyllable(syllable.to_owned());

    let tone = syllable
        .chars()
        .last()
        .and_then(|c| c.to_digit(10))
        .filter(|t| (1..=6).contains(t))
        .ok_or_else(err)? as i32;
    let body = &syllable[..syllable.len() - 1];
    if body.is_empty() || !body.bytes().all(|b| b.is_ascii_lowercase()) {
        return Err(err());
    }

    // syllabic nasals, optionally aspirated
    let (onset, rest) = match body {
        "m" | "ng" => ("", body),
        "hm" | "hng" => body.split_at(1),
        _ => {
            let onset = longest_prefix(body, &ONSETS).unwrap_or("");
            (onset, &body[onset.len()..])
        }
    };
    let coda = longest_suffix(rest, &CODAS).unwrap_or("");
    let nucleus = &rest[..rest.len() - coda.len()];
    if !NUCLEI.contains(&nucleus) {
        return Err(err());
    }

    Ok(JyutpingSyllable {
        onset,
        nucleus,
        coda,
        tone,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    fn parts(s: &str) -> (&str, &str, &str, i32) {
        let j = parse_jyutping(s).unwrap();
        (j.onset, j.nucleus, j.coda, j.tone)
    }

    #[test]
    fn test_parse_common_syllables() {
        assert_eq!(parts("nei5"), ("n", "e", "i", 5));
        assert_eq!(parts("hou2"), ("h", "o", "u", 2));
        assert_eq!(parts("gwong2"), ("gw", "o", "ng", 2));
        assert_eq!(parts("jyut6"), ("j", "yu", "t", 6));
        assert_eq!(parts("keoi5"), ("k", "eo", "i", 5));
        assert_eq!(parts("aa1"), ("", "aa", "", 1));
        assert_eq!(parts("aai3"), ("", "aa", "i", 3));
        assert_eq!(parts("ngo5"), ("ng", "o", "", 5));
        assert_eq!(parts("si1"), ("s", "i", "", 1));
        assert_eq!(parts("soeng2"), ("s", "oe", "ng", 2));
    }

    #[test]
    fn test_parse_syllabic_nasals() {
        assert_eq!(parts("m4"), ("", "m", "", 4));
        assert_eq!(parts("ng5"), ("", "ng", "", 5));
        assert_eq!(parts("hm6"), ("h", "m", "", 6));
        assert_eq!(parts("hng6"), ("h", "ng", "", 6));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["", "nei", "nei7", "nei0", "NEI5", "x1", "5", "zzz3", "nei 5"] {
            assert!(
                matches!(parse_jyutping(bad), Err(G2pError::UnparsableSyllable(_))),
                "{bad}"
            );
        }
    }

    #[test]
    fn test_phones_skip_absent_parts() {
        let j = parse_jyutping("gwong2").unwrap();
        assert_eq!(
            j.phones().as_slice(),
            &[
                ("gw", SyllablePosition::Onset),
                ("o", SyllablePosition::Nucleus),
                ("ng", SyllablePosition::Coda)
            ]
        );
    }

    #[test]
    fn test_positions_count_present_parts() {
        let positions = |s: &str| -> Vec<i32> {
            parse_jyutping(s)
                .unwrap()
                .phones()
                .iter()
                .map(|(_, pos)| *pos as i32)
                .collect()
        };
        assert_eq!(positions("aa1"), vec![1]);
        assert_eq!(positions("oi3"), vec![1, 2]);
        assert_eq!(positions("m4"), vec![1]);
        assert_eq!(positions("hm6"), vec![1, 2]);
        assert_eq!(positions("si1"), vec![1, 2]);
        assert_eq!(positions("nei5"), vec![1, 2, 3]);
    }

    #[test]
    fn test_symbols_are_the_union() {
        let union: BTreeSet<&str> = ONSETS
            .iter()
            .chain(NUCLEI.iter())
            .chain(CODAS.iter())
            .copied()
            .collect();
        let symbols: BTreeSet<&str> = CANTONESE_SYMBOLS.iter().copied().collect();
        assert_eq!(union, symbols);
        assert_eq!(symbols.len(), CANTONESE_SYMBOLS.len());
    }
}
