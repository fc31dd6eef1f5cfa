use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::clock::{Clock, SystemClock};
use crate::error::FetchError;
use crate::language::{EntryMode, Language};
use crate::metrics::{self, SessionResult, Stats};
use crate::normalizer::{normalize, Normalized};
use crate::page::{generate_page, Page, PageEntry, WORDS_PER_PAGE};
use crate::provider::WordProvider;
use crate::word::{Word, WordPool};

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub page_size: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            page_size: WORDS_PER_PAGE,
        }
    }
}

/// Coarse lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No page to type on (nothing loaded yet, or the pool was empty).
    Empty,
    /// A page is shown but the timer has not started.
    Loaded,
    /// The timer is running and input is accepted.
    Running,
    /// Stats are computed; only a reload leaves this state.
    Finished,
}

/// Handle for one pool fetch. Only the most recently issued ticket is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    pub language: Language,
    pub level: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The pool replaced the session state.
    Applied,
    /// A newer load was issued after this one; the response was dropped.
    Stale,
    /// The fetch failed; the previous page is still in place.
    Failed,
}

/// Discrete events from the UI layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    InputChanged(String),
    BackspaceAtEmpty,
    Skip,
    Restart,
    Finish,
    SelectLanguage(Language),
    SelectLevel(u32),
}

/// Work the caller has to carry out after a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Fetch a pool for the ticket and hand it back via `complete_load`.
    Load(LoadTicket),
    /// Emit the result to the sink; the outcome never feeds back.
    Submit(SessionResult),
}

/// The typing-session state machine
pub struct Session {
    config: SessionConfig,
    pool: WordPool,
    page: Page,
    current_index: usize,
    raw_input: String,
    input_history: Vec<String>,
    keystroke_total: u64,
    keystroke_correct: u64,
    past_char_count: usize,
    started_at: Option<Instant>,
    finished: bool,
    stats: Option<Stats>,
    language: Language,
    level: u32,
    selected_language: Language,
    selected_level: u32,
    generation: u64,
    pending_load: Option<u64>,
    clock: Arc<dyn Clock>,
    rng: Box<dyn RngCore + Send>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("language", &self.language)
            .field("level", &self.level)
            .field("page_len", &self.page.len())
            .field("current_index", &self.current_index)
            .field("raw_input", &self.raw_input)
            .field("keystroke_total", &self.keystroke_total)
            .field("keystroke_correct", &self.keystroke_correct)
            .field("past_char_count", &self.past_char_count)
            .field("finished", &self.finished)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

impl Session {
    pub fn new(language: Language, level: u32, config: SessionConfig) -> Self {
        Self {
            config,
            pool: WordPool::default(),
            page: Page::default(),
            current_index: 0,
            raw_input: String::new(),
            input_history: Vec::new(),
            keystroke_total: 0,
            keystroke_correct: 0,
            past_char_count: 0,
            started_at: None,
            finished: false,
            stats: None,
            language,
            level,
            selected_language: language,
            selected_level: level,
            generation: 0,
            pending_load: None,
            clock: Arc::new(SystemClock),
            rng: Box::new(StdRng::from_entropy()),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the randomness used for page sampling
    pub fn with_rng<R: RngCore + Send + 'static>(mut self, rng: R) -> Self {
        self.rng = Box::new(rng);
        self
    }

    // ---- loading ----

    /// Start a load for `language`/`level`. The returned ticket supersedes
    /// every ticket issued before it.
    pub fn request_load(&mut self, language: Language, level: u32) -> LoadTicket {
        self.generation += 1;
        self.pending_load = Some(self.generation);
        self.selected_language = language;
        self.selected_level = level;
        tracing::debug!(generation = self.generation, lang = language.code(), level, "load requested");

        LoadTicket {
            generation: self.generation,
            language,
            level,
        }
    }

    /// Apply the response for a ticket, unless a newer load has been issued.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<Word>, FetchError>,
    ) -> LoadOutcome {
        if ticket.generation != self.generation {
            tracing::debug!(
                generation = ticket.generation,
                latest = self.generation,
                "discarding stale word pool"
            );
            return LoadOutcome::Stale;
        }
        self.pending_load = None;

        match result {
            Ok(words) => {
                self.apply_pool(ticket.language, ticket.level, WordPool::new(words));
                tracing::info!(
                    lang = ticket.language.code(),
                    level = ticket.level,
                    pool = self.pool.len(),
                    "word pool loaded"
                );
                LoadOutcome::Applied
            }
            Err(e) => {
                tracing::warn!(
                    lang = ticket.language.code(),
                    level = ticket.level,
                    "failed to load words: {e}"
                );
                LoadOutcome::Failed
            }
        }
    }

    /// Fetch a pool from `provider` and apply it.
    pub async fn load_page(
        &mut self,
        provider: &dyn WordProvider,
        language: Language,
        level: u32,
    ) -> LoadOutcome {
        let ticket = self.request_load(language, level);
        let result = provider.fetch(language, level).await;
        self.complete_load(ticket, result)
    }

    fn apply_pool(&mut self, language: Language, level: u32, pool: WordPool) {
        self.language = language;
        self.level = level;
        self.pool = pool;
        self.current_index = 0;
        self.raw_input.clear();
        self.input_history.clear();
        self.keystroke_total = 0;
        self.keystroke_correct = 0;
        self.past_char_count = 0;
        self.started_at = None;
        self.finished = false;
        self.stats = None;
        self.page = generate_page(&self.pool, self.config.page_size, self.rng.as_mut());
    }

    /// Reload with the most recent language/level selection
    pub fn restart(&mut self) -> LoadTicket {
        self.request_load(self.selected_language, self.selected_level)
    }

    // ---- typing ----

    /// The raw input buffer changed.
    pub fn on_input(&mut self, raw: &str) {
        if self.finished {
            return;
        }
        self.raw_input = raw.to_string();

        let Some(entry) = self.page.get(self.current_index) else {
            return;
        };
        let target = entry.word.target_pron.clone();

        if self.started_at.is_none() && !raw.is_empty() {
            self.started_at = Some(self.clock.now());
        }

        let normalized = normalize(raw, self.language);
        let effective = normalized.effective();

        let is_correct = match self.language.entry_mode() {
            EntryMode::Transliterated => {
                let typed_len = effective.chars().count();
                target.chars().take(typed_len).eq(effective.chars())
                    && target.chars().count() >= typed_len
            }
            EntryMode::Direct => target.starts_with(raw),
        };

        self.keystroke_total += 1;
        if is_correct {
            self.keystroke_correct += 1;
        }

        if effective == target {
            self.advance_word(effective.to_string());
        }
    }

    /// Record `typed` for the current word and move on, regenerating the
    /// page from the same pool after its last slot.
    pub fn advance_word(&mut self, typed: String) {
        if self.page.is_empty() {
            return;
        }
        self.input_history.push(typed);

        if self.page.is_last(self.current_index) {
            self.past_char_count += self.page.total_target_chars();
            self.input_history.clear();
            self.current_index = 0;
            self.raw_input.clear();
            self.page = generate_page(&self.pool, self.config.page_size, self.rng.as_mut());
            tracing::debug!(past_chars = self.past_char_count, "page complete, drew a new one");
        } else {
            self.current_index += 1;
            self.raw_input.clear();
        }
    }

    /// Backspace on an empty buffer re-opens the previous word for editing.
    ///
    /// Returns whether anything changed.
    pub fn on_backspace_at_empty(&mut self) -> bool {
        if self.finished || !self.raw_input.is_empty() || self.current_index == 0 {
            return false;
        }
        let Some(previous) = self.input_history.pop() else {
            return false;
        };
        self.current_index -= 1;
        self.raw_input = previous;
        true
    }

    /// Skip the current word, counting its untyped tail as misses.
    ///
    /// Skipping the last slot is allowed on purpose: it goes through
    /// `advance_word` and regenerates the page like typing the word would.
    /// Returns whether the skip happened.
    pub fn on_skip(&mut self) -> bool {
        if self.finished {
            return false;
        }
        let Some(entry) = self.current_entry() else {
            return false;
        };
        let target_len = entry.word.target_len();
        let effective = self.normalized().confirmed;

        let missing = target_len.saturating_sub(effective.chars().count());
        self.keystroke_total += missing as u64;

        self.advance_word(effective);
        true
    }

    /// Stop the clock and compute the final stats.
    ///
    /// The in-progress word counts with its full target length, so an
    /// unfinished last word still adds to the speed.
    pub fn on_finish(&mut self) -> Option<SessionResult> {
        if self.finished {
            return None;
        }
        let started_at = self.started_at?;
        let elapsed = self.clock.now().saturating_duration_since(started_at);

        let current_len = self
            .current_entry()
            .map(|e| e.word.target_len())
            .unwrap_or(0);
        let total_chars = self.past_char_count
            + self.page.target_chars_before(self.current_index)
            + current_len;

        let stats = Stats {
            wpm: metrics::wpm(total_chars, elapsed),
            accuracy: metrics::accuracy(self.keystroke_correct, self.keystroke_total),
        };
        self.finished = true;
        self.stats = Some(stats);

        tracing::info!(
            wpm = stats.wpm,
            accuracy = stats.accuracy,
            chars = total_chars,
            elapsed_secs = elapsed.as_secs_f64(),
            "session finished"
        );

        Some(SessionResult::new(stats, Utc::now().timestamp_millis()))
    }

    /// Route a UI command to the matching operation.
    pub fn dispatch(&mut self, command: Command) -> Effect {
        match command {
            Command::InputChanged(raw) => {
                self.on_input(&raw);
                Effect::None
            }
            Command::BackspaceAtEmpty => {
                self.on_backspace_at_empty();
                Effect::None
            }
            Command::Skip => {
                self.on_skip();
                Effect::None
            }
            Command::Restart => Effect::Load(self.restart()),
            Command::Finish => self.on_finish().map_or(Effect::None, Effect::Submit),
            Command::SelectLanguage(language) => {
                Effect::Load(self.request_load(language, self.selected_level))
            }
            Command::SelectLevel(level) => {
                Effect::Load(self.request_load(self.selected_language, level))
            }
        }
    }

    // ---- queries ----

    pub fn phase(&self) -> Phase {
        if self.finished {
            Phase::Finished
        } else if self.page.is_empty() {
            Phase::Empty
        } else if self.started_at.is_some() {
            Phase::Running
        } else {
            Phase::Loaded
        }
    }

    /// Current raw input split for display and correctness checks
    pub fn normalized(&self) -> Normalized {
        normalize(&self.raw_input, self.language)
    }

    /// Running accuracy, 100 before the first keystroke
    pub fn accuracy(&self) -> u8 {
        metrics::accuracy(self.keystroke_correct, self.keystroke_total)
    }

    pub fn current_entry(&self) -> Option<&PageEntry> {
        self.page.get(self.current_index)
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn pool(&self) -> &WordPool {
        &self.pool
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn raw_input(&self) -> &str {
        &self.raw_input
    }

    pub fn input_history(&self) -> &[String] {
        &self.input_history
    }

    pub fn keystroke_total(&self) -> u64 {
        self.keystroke_total
    }

    pub fn keystroke_correct(&self) -> u64 {
        self.keystroke_correct
    }

    pub fn past_char_count(&self) -> usize {
        self.past_char_count
    }

    pub fn has_started(&self) -> bool {
        self.started_at.is_some()
    }

    /// Time since the first keystroke of this page-load cycle
    pub fn elapsed(&self) -> Option<Duration> {
        self.started_at
            .map(|start| self.clock.now().saturating_duration_since(start))
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Final stats, present once finished
    pub fn stats(&self) -> Option<Stats> {
        self.stats
    }

    /// Language of the page currently shown
    pub fn language(&self) -> Language {
        self.language
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// The latest language/level the user picked, which may still be loading
    pub fn selection(&self) -> (Language, u32) {
        (self.selected_language, self.selected_level)
    }

    pub fn is_loading(&self) -> bool {
        self.pending_load.is_some()
    }
}
