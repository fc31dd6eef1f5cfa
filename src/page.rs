use crate::word::{Word, WordPool};
use rand::seq::SliceRandom;
use rand::Rng;

/// Default number of words shown per page
pub const WORDS_PER_PAGE: usize = 14;

/// Page-local identity of an entry: the source word plus the slot it was drawn into.
///
/// Unique within one page even when the same word is drawn more than once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageId {
    pub word_id: u64,
    pub slot: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageEntry {
    pub word: Word,
    pub page_id: PageId,
}

/// Fixed-length working set of words for one typing round
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    entries: Vec<PageEntry>,
}

impl Page {
    pub fn entries(&self) -> &[PageEntry] {
        &self.entries
    }

    pub fn get(&self, idx: usize) -> Option<&PageEntry> {
        self.entries.get(idx)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_last(&self, idx: usize) -> bool {
        !self.entries.is_empty() && idx == self.entries.len() - 1
    }

    /// Sum of target lengths over the whole page
    pub fn total_target_chars(&self) -> usize {
        self.entries.iter().map(|e| e.word.target_len()).sum()
    }

    /// Sum of target lengths over the entries before `idx`
    pub fn target_chars_before(&self, idx: usize) -> usize {
        self.entries
            .iter()
            .take(idx)
            .map(|e| e.word.target_len())
            .sum()
    }
}

/// Draw `size` words uniformly at random, with replacement, from `pool`.
///
/// An empty pool yields an empty page.
pub fn generate_page<R: Rng + ?Sized>(pool: &WordPool, size: usize, rng: &mut R) -> Page {
    let words = pool.words();
    let entries = (0..size)
        .filter_map(|slot| {
            words.choose(&mut *rng).map(|word| PageEntry {
                page_id: PageId {
                    word_id: word.id,
                    slot,
                },
                word: word.clone(),
            })
        })
        .collect();

    Page { entries }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn create_test_pool() -> WordPool {
        WordPool::new(vec![
            Word::new(1, "猫", "ねこ"),
            Word::new(2, "犬", "いぬ"),
            Word::new(3, "水", "みず"),
        ])
    }

    #[test]
    fn test_empty_pool_yields_empty_page() {
        let mut rng = StdRng::seed_from_u64(1);
        let page = generate_page(&WordPool::default(), WORDS_PER_PAGE, &mut rng);

        assert!(page.is_empty());
        assert_eq!(page.total_target_chars(), 0);
        assert!(!page.is_last(0));
    }

    #[test]
    fn test_page_has_requested_size() {
        let pool = create_test_pool();
        let mut rng = StdRng::seed_from_u64(7);

        for size in [1, 5, WORDS_PER_PAGE, 27] {
            let page = generate_page(&pool, size, &mut rng);
            assert_eq!(page.len(), size, "Should return exactly {size} entries");
        }
    }

    #[test]
    fn test_page_ids_unique_with_repeated_words() {
        let pool = WordPool::new(vec![Word::new(42, "猫", "ねこ")]);
        let mut rng = StdRng::seed_from_u64(3);
        let page = generate_page(&pool, 10, &mut rng);

        // every entry is the same word
        assert!(page.entries().iter().all(|e| e.word.id == 42));

        let ids: HashSet<PageId> = page.entries().iter().map(|e| e.page_id).collect();
        assert_eq!(ids.len(), 10);
    }

    #[test]
    fn test_entries_are_drawn_from_pool() {
        let pool = create_test_pool();
        let mut rng = StdRng::seed_from_u64(11);
        let page = generate_page(&pool, 50, &mut rng);

        for entry in page.entries() {
            assert!(pool.words().contains(&entry.word));
            assert_eq!(entry.page_id.word_id, entry.word.id);
        }
    }

    #[test]
    fn test_same_seed_same_page() {
        let pool = create_test_pool();
        let a = generate_page(&pool, WORDS_PER_PAGE, &mut StdRng::seed_from_u64(99));
        let b = generate_page(&pool, WORDS_PER_PAGE, &mut StdRng::seed_from_u64(99));
        assert_eq!(a, b);
    }

    #[test]
    fn test_char_totals() {
        let pool = WordPool::new(vec![Word::new(1, "house", "Haus")]);
        let page = generate_page(&pool, 3, &mut StdRng::seed_from_u64(0));

        assert_eq!(page.total_target_chars(), 12);
        assert_eq!(page.target_chars_before(0), 0);
        assert_eq!(page.target_chars_before(2), 8);
        assert!(page.is_last(2));
        assert!(!page.is_last(1));
    }
}
