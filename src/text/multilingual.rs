// text/multilingual.rs
use log::debug;

use crate::{
    Language,
    error::{G2pError, Result},
    phoneme::{PAD, START_PAD, detection::is_cjk},
    text::{G2p, G2pOutput},
};

/// A maximal run of characters that are all CJK or all not CJK.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptRun<'t> {
    pub text: &'t str,
    pub is_cjk: bool,
}

pub fn split_script_runs(text: &str) -> Vec<ScriptRun<'_>> {
    let mut runs = Vec::new();
    let mut start = 0;
    let mut current: Option<bool> = None;

    for (i, c) in text.char_indices() {
        let cjk = is_cjk(c);
        match current {
            Some(prev) if prev != cjk => {
                runs.push(ScriptRun {
                    text: &text[start..i],
                    is_cjk: prev,
                });
                start = i;
            }
            _ => {}
        }
        current = Some(cjk);
    }
    if let Some(is_cjk) = current {
        runs.push(ScriptRun {
            text: &text[start..],
            is_cjk,
        });
    }
    runs
}

/// Mixed-script G2P. CJK runs go to `cjk`, which must be the strategy for
/// `cjk_lang`; everything else goes to `en`. Outputs are concatenated in
/// source order and padded with `-` .. `_`.
pub fn g2p(
    text: &str,
    cjk_lang: Language,
    phoneme: Option<&str>,
    padding: bool,
    cjk: &mut dyn G2p,
    en: &mut dyn G2p,
) -> Result<G2pOutput> {
    if phoneme.is_some() {
        return Err(G2pError::NotImplemented("phoneme input for multilingual text"));
    }
    if !matches!(cjk_lang, Language::Cantonese | Language::Mandarin) {
        return Err(G2pError::InvalidLanguageForScript(cjk_lang.to_string()));
    }

    let mut out = G2pOutput::default();
    for run in split_script_runs(text) {
        if run.text.trim().is_empty() {
            continue;
        }
        debug!("multilingual run {:?} cjk={}", run.text, run.is_cjk);
        let part = if run.is_cjk {
            cjk.g2p(run.text, None, false)?
        } else {
            en.g2p(run.text, None, false)?
        };
        out.extend(part);
    }

    if padding {
        out.pad(START_PAD, PAD, 0);
    }
    out.log("multilingual");
    debug_assert!(out.is_aligned());
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::{SyllablePosition, WordPosition};

    /// One phone per non-space char, tagged with a fixed language id.
    struct PerChar(i32);

    impl G2p for PerChar {
        fn g2p(&mut self, text: &str, _: Option<&str>, padding: bool) -> Result<G2pOutput> {
            assert!(!padding);
            let mut out = G2pOutput::default();
            for c in text.chars().filter(|c| !c.is_whitespace()) {
                out.push_phone(
                    c.to_string(),
                    1,
                    WordPosition::Begin,
                    SyllablePosition::Onset,
                    self.0,
                );
                out.word2ph.push(1);
            }
            Ok(out)
        }
    }

    #[test]
    fn test_split_script_runs() {
        let runs = split_script_runs("Hi你好, ok世界");
        assert_eq!(
            runs,
            vec![
                ScriptRun { text: "Hi", is_cjk: false },
                ScriptRun { text: "你好", is_cjk: true },
                ScriptRun { text: ", ok", is_cjk: false },
                ScriptRun { text: "世界", is_cjk: true },
            ]
        );
        assert!(split_script_runs("").is_empty());
    }

    #[test]
    fn test_source_order_and_padding() {
        let out = g2p(
            "Hello 世界",
            Language::Mandarin,
            None,
            true,
            &mut PerChar(1),
            &mut PerChar(2),
        )
        .unwrap();
        assert_eq!(
            out.phones,
            vec!["-", "H", "e", "l", "l", "o", "世", "界", "_"]
        );
        assert_eq!(out.lang_ids, vec![0, 2, 2, 2, 2, 2, 1, 1, 0]);
        assert_eq!(out.tones.first(), Some(&0));
        assert_eq!(out.tones.last(), Some(&0));
        assert_eq!(out.word2ph.first(), Some(&1));
        assert!(out.is_aligned());
    }

    #[test]
    fn test_whitespace_runs_are_skipped() {
        let out = g2p(
            "你 好",
            Language::Cantonese,
            None,
            false,
            &mut PerChar(0),
            &mut PerChar(2),
        )
        .unwrap();
        assert_eq!(out.phones, vec!["你", "好"]);
        assert_eq!(out.lang_ids, vec![0, 0]);
    }

    #[test]
    fn test_rejects_non_cjk_language() {
        assert!(matches!(
            g2p("hi", Language::English, None, true, &mut PerChar(0), &mut PerChar(2)),
            Err(G2pError::InvalidLanguageForScript(l)) if l == "en"
        ));
    }

    #[test]
    fn test_rejects_phoneme_input() {
        assert!(matches!(
            g2p("hi", Language::Cantonese, Some("x"), true, &mut PerChar(0), &mut PerChar(2)),
            Err(G2pError::NotImplemented(_))
        ));
    }
}
