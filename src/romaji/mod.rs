//! Romaji-to-kana conversion in IME mode.
//!
//! Lowercase romaji becomes hiragana, uppercase becomes katakana. Keystrokes
//! that cannot (yet) be resolved are copied through verbatim, so a trailing
//! consonant stays visible as latin text until its vowel arrives.

mod table;

use std::collections::HashMap;
use std::sync::OnceLock;

use table::{MAX_ROMAJI_LEN, ROMAJI_TABLE};

const PROLONGED_SOUND_MARK: char = 'ー';
const HIRAGANA_TO_KATAKANA_OFFSET: u32 = 0x60;

fn lookup_table() -> &'static HashMap<&'static str, &'static str> {
    static TABLE: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    TABLE.get_or_init(|| ROMAJI_TABLE.iter().copied().collect())
}

/// True for hiragana, katakana and the prolonged sound mark.
pub fn is_kana(c: char) -> bool {
    matches!(c, '\u{3041}'..='\u{309F}' | '\u{30A0}'..='\u{30FF}') || c == PROLONGED_SOUND_MARK
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'i' | 'u' | 'e' | 'o')
}

fn is_consonant(c: char) -> bool {
    c.is_ascii_alphabetic() && !is_vowel(c)
}

fn to_katakana(hiragana: &str) -> String {
    hiragana
        .chars()
        .map(|c| match c {
            '\u{3041}'..='\u{3096}' => {
                char::from_u32(c as u32 + HIRAGANA_TO_KATAKANA_OFFSET).unwrap_or(c)
            }
            _ => c,
        })
        .collect()
}

fn push_kana(out: &mut String, hiragana: &str, katakana: bool) {
    if katakana {
        out.push_str(&to_katakana(hiragana));
    } else {
        out.push_str(hiragana);
    }
}

/// Convert raw romaji keystrokes into kana, leaving unresolved input in place.
///
/// A lone trailing `n` is kept as `n`, since the next keystroke decides
/// between `ん` and the `n`-row.
pub fn to_kana(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let lower: Vec<char> = chars.iter().map(|c| c.to_ascii_lowercase()).collect();
    let table = lookup_table();

    let mut out = String::with_capacity(input.len() * 3);
    let mut i = 0;

    while i < chars.len() {
        let c = lower[i];
        let katakana = chars[i].is_ascii_uppercase();
        let next = lower.get(i + 1).copied();

        // sokuon: doubled consonant, or the "tch" spelling
        if is_consonant(c) && c != 'n' {
            let doubled = next == Some(c);
            let tch = c == 't' && next == Some('c') && lower.get(i + 2) == Some(&'h');
            if doubled || tch {
                push_kana(&mut out, "っ", katakana);
                i += 1;
                continue;
            }
        }

        if c == 'n' {
            match next {
                None => {
                    out.push(chars[i]);
                    i += 1;
                    continue;
                }
                Some('n') | Some('\'') => {
                    push_kana(&mut out, "ん", katakana);
                    i += 2;
                    continue;
                }
                Some(n) if is_consonant(n) && n != 'y' => {
                    push_kana(&mut out, "ん", katakana);
                    i += 1;
                    continue;
                }
                _ => {}
            }
        }

        let longest = (1..=MAX_ROMAJI_LEN.min(chars.len() - i))
            .rev()
            .find_map(|len| {
                let candidate: String = lower[i..i + len].iter().collect();
                table.get(candidate.as_str()).map(|kana| (len, *kana))
            });

        match longest {
            Some((len, kana)) => {
                push_kana(&mut out, kana, katakana);
                i += len;
            }
            None => {
                out.push(chars[i]);
                i += 1;
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_words() {
        assert_eq!(to_kana("neko"), "ねこ");
        assert_eq!(to_kana("inu"), "いぬ");
        assert_eq!(to_kana("sakana"), "さかな");
        assert_eq!(to_kana("tsuki"), "つき");
    }

    #[test]
    fn test_dangling_consonant_stays_latin() {
        assert_eq!(to_kana("nek"), "ねk");
        assert_eq!(to_kana("ky"), "ky");
        assert_eq!(to_kana("sh"), "sh");
    }

    #[test]
    fn test_sokuon() {
        assert_eq!(to_kana("kitte"), "きって");
        assert_eq!(to_kana("gakkou"), "がっこう");
        assert_eq!(to_kana("kitt"), "きっt");
        assert_eq!(to_kana("matcha"), "まっちゃ");
    }

    #[test]
    fn test_n_resolution() {
        assert_eq!(to_kana("hon"), "ほn");
        assert_eq!(to_kana("honn"), "ほん");
        assert_eq!(to_kana("hon'ya"), "ほんや");
        assert_eq!(to_kana("sensei"), "せんせい");
        assert_eq!(to_kana("konnnichiha"), "こんにちは");
        assert_eq!(to_kana("konya"), "こにゃ");
    }

    #[test]
    fn test_yoon_and_alternate_spellings() {
        assert_eq!(to_kana("densha"), "でんしゃ");
        assert_eq!(to_kana("densya"), "でんしゃ");
        assert_eq!(to_kana("ryokou"), "りょこう");
        assert_eq!(to_kana("chi"), to_kana("ti"));
        assert_eq!(to_kana("fu"), to_kana("hu"));
    }

    #[test]
    fn test_uppercase_becomes_katakana() {
        assert_eq!(to_kana("NEKO"), "ネコ");
        assert_eq!(to_kana("KOHI-"), "コヒー");
    }

    #[test]
    fn test_kana_passes_through() {
        assert_eq!(to_kana("ねこ"), "ねこ");
        assert_eq!(to_kana("ねk"), "ねk");
    }

    #[test]
    fn test_unknown_characters_are_copied() {
        assert_eq!(to_kana("q"), "q");
        assert_eq!(to_kana("ka1"), "か1");
        assert_eq!(to_kana(""), "");
    }

    #[test]
    fn test_is_kana() {
        assert!(is_kana('ね'));
        assert!(is_kana('ネ'));
        assert!(is_kana('ー'));
        assert!(is_kana('っ'));
        assert!(!is_kana('k'));
        assert!(!is_kana('猫'));
    }
}
