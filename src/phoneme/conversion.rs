use log::warn;

use crate::phoneme::symbol::{SYMBOLS, UNK};

/// Maps full-width and typographic punctuation onto the canonical set.
/// Characters without an entry are returned unchanged by the caller.
pub fn replace_punctuation_char(c: char) -> Option<&'static str> {
    match c {
        '：' | '；' | '，' | '、' | '·' => Some(","),
        '。' | '\n' | '$' => Some("."),
        '！' => Some("!"),
        '？' => Some("?"),
        '…' => Some("..."),
        '⋯' => Some("…"),
        '“' | '”' | '"' | '‘' | '’' => Some("'"),
        '（' | '）' | '(' | ')' => Some("'"),
        '《' | '》' | '【' | '】' | '[' | ']' | '「' | '」' => Some("'"),
        '—' | '～' | '~' => Some("-"),
        _ => None,
    }
}

pub fn replace_punctuation(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match replace_punctuation_char(c) {
            Some(p) => out.push_str(p),
            None => out.push(c),
        }
    }
    out
}

fn replace_phone(ph: &str) -> &str {
    match ph {
        "：" | "；" | "，" | "·" | "、" => ",",
        "。" | "\n" => ".",
        "！" => "!",
        "？" => "?",
        "…" | "···" | "・・・" => "...",
        "v" => "V",
        ph => ph,
    }
}

/// Canonicalizes a predicted English phone. Anything outside the vocabulary
/// becomes `UNK`; the lost symbol is logged.
pub fn post_replace_ph(ph: &str) -> String {
    let ph = replace_phone(ph);
    if SYMBOLS.contains(ph) {
        ph.to_owned()
    } else {
        warn!("phone {:?} is not in the vocabulary, replaced with {}", ph, UNK);
        UNK.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_punctuation() {
        assert_eq!(replace_punctuation("你好，世界！"), "你好,世界!");
        assert_eq!(replace_punctuation("「好」"), "'好'");
        assert_eq!(replace_punctuation("等等…"), "等等...");
        assert_eq!(replace_punctuation("⋯"), "…");
        assert_eq!(replace_punctuation("a～b"), "a-b");
        assert_eq!(replace_punctuation("plain"), "plain");
    }

    #[test]
    fn test_post_replace_ph() {
        assert_eq!(post_replace_ph("v"), "V");
        assert_eq!(post_replace_ph("ah"), "ah");
        assert_eq!(post_replace_ph("，"), ",");
        assert_eq!(post_replace_ph("XYZ"), UNK);
        // "..." is not a single vocabulary symbol
        assert_eq!(post_replace_ph("・・・"), UNK);
    }
}
