use crate::phoneme::symbol::PUNCTUATIONS;

/// CJK Unified Ideographs and Extension A. Later extensions are treated as non-CJK.
pub fn is_cjk(c: char) -> bool {
    ('\u{4E00}'..='\u{9FFF}').contains(&c) || ('\u{3400}'..='\u{4DBF}').contains(&c)
}

pub fn str_is_cjk(s: &str) -> bool {
    !s.is_empty() && s.chars().all(is_cjk)
}

pub fn is_punctuation(s: &str) -> bool {
    PUNCTUATIONS.contains(&s)
}

pub fn is_punctuation_char(c: char) -> bool {
    let mut b = [0; 4];
    is_punctuation(c.encode_utf8(&mut b))
}
