// text/normalize.rs
use jieba_rs::Jieba;

use crate::{
    Language,
    phoneme::{
        conversion::replace_punctuation,
        detection::{is_cjk, is_punctuation_char},
    },
};

fn keep_char(c: char, lang: Language) -> bool {
    if c.is_whitespace() {
        return false;
    }
    match lang {
        Language::English => c.is_alphabetic() || is_punctuation_char(c),
        Language::Cantonese | Language::Mandarin => is_cjk(c) || is_punctuation_char(c),
        Language::Multilingual => is_cjk(c) || c.is_alphabetic() || is_punctuation_char(c),
    }
}

/// Trims `text`, canonicalizes its punctuation and drops every character the
/// language does not keep. Whitespace never survives.
pub fn text_normalize(text: &str, lang: Language) -> String {
    replace_punctuation(text.trim())
        .chars()
        .filter(|&c| keep_char(c, lang))
        .collect()
}

/// Normalizes each whitespace separated token and joins the non-empty ones
/// with single spaces, keeping word boundaries intact.
pub fn normalize_words(text: &str, lang: Language) -> String {
    text.split_whitespace()
        .map(|w| text_normalize(w, lang))
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Inserts word boundaries into runs of CJK text with jieba. Text that is not
/// CJK is copied through untouched.
pub fn segment_words(jieba: &Jieba, text: &str) -> String {
    let mut out = String::with_capacity(text.len() * 2);
    for token in text.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        if token.chars().any(is_cjk) {
            let words: Vec<&str> = jieba
                .cut(token, true)
                .into_iter()
                .filter(|w| !w.trim().is_empty())
                .collect();
            out.push_str(&words.join(" "));
        } else {
            out.push_str(token);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cjk_keeps_han_and_punctuation() {
        assert_eq!(
            text_normalize(" 你好，世界！abc ", Language::Cantonese),
            "你好,世界!"
        );
        assert_eq!(text_normalize("「佢」", Language::Mandarin), "'佢'");
        assert_eq!(text_normalize("12你", Language::Mandarin), "你");
    }

    #[test]
    fn test_english_keeps_letters_and_punctuation() {
        assert_eq!(
            text_normalize("Hello,“world”…", Language::English),
            "Hello,'world'..."
        );
        assert_eq!(text_normalize("R2-D2", Language::English), "R-D");
    }

    #[test]
    fn test_multilingual_keeps_both_scripts() {
        assert_eq!(
            text_normalize("Hi你好！#", Language::Multilingual),
            "Hi你好!"
        );
    }

    #[test]
    fn test_normalize_words_preserves_boundaries() {
        assert_eq!(
            normalize_words("  你好   世界 ！ 42 ", Language::Mandarin),
            "你好 世界 !"
        );
        assert_eq!(normalize_words("   ", Language::English), "");
    }

    #[test]
    fn test_segment_words_splits_cjk_only() {
        let jieba = Jieba::new();
        let segmented = segment_words(&jieba, "我们是中国人 hello");
        assert!(segmented.ends_with(" hello"));
        let joined: String = segmented.split_whitespace().collect();
        assert_eq!(joined, "我们是中国人hello");
        assert!(segmented.split_whitespace().count() > 2);
    }
}
