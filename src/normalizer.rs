use crate::language::{EntryMode, Language};
use crate::romaji;

/// Raw input split into the part already resolved into the target script
/// and the trailing part still awaiting resolution
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Normalized {
    pub confirmed: String,
    pub pending: String,
}

impl Normalized {
    /// The fully converted form, `confirmed` followed by `pending`
    pub fn converted(&self) -> String {
        format!("{}{}", self.confirmed, self.pending)
    }

    /// The string used for correctness checks
    pub fn effective(&self) -> &str {
        &self.confirmed
    }
}

/// Split a raw input buffer for the given language.
///
/// Pure: calling it repeatedly with the same arguments yields the same split.
pub fn normalize(raw: &str, language: Language) -> Normalized {
    match language.entry_mode() {
        EntryMode::Direct => Normalized {
            confirmed: raw.to_string(),
            pending: String::new(),
        },
        EntryMode::Transliterated => {
            let converted = romaji::to_kana(raw);
            let split = converted
                .char_indices()
                .find(|(_, c)| !romaji::is_kana(*c))
                .map(|(idx, _)| idx)
                .unwrap_or(converted.len());
            let (confirmed, pending) = converted.split_at(split);
            Normalized {
                confirmed: confirmed.to_string(),
                pending: pending.to_string(),
            }
        }
    }
}
