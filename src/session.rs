use crate::corpus::WordCorpus;
use crate::input::{self, InputOutcome, Keystroke, Transcript};
use crate::scoring::{self, Score};
use rand::Rng;
use serde::{Deserialize, Serialize};

pub const DEFAULT_WORD_COUNT: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Status {
    Idle,
    Active,
    Finished,
}

/// Configurable session lengths, cycled in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum SessionLength {
    Fifteen,
    #[default]
    Thirty,
    FortyFive,
}

impl SessionLength {
    pub const ALL: [SessionLength; 3] = [
        SessionLength::Fifteen,
        SessionLength::Thirty,
        SessionLength::FortyFive,
    ];

    pub fn secs(self) -> u32 {
        match self {
            SessionLength::Fifteen => 15,
            SessionLength::Thirty => 30,
            SessionLength::FortyFive => 45,
        }
    }

    pub fn next(self) -> Self {
        match self {
            SessionLength::Fifteen => SessionLength::Thirty,
            SessionLength::Thirty => SessionLength::FortyFive,
            SessionLength::FortyFive => SessionLength::Fifteen,
        }
    }

    pub fn from_secs(secs: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.secs() == secs)
    }
}

impl TryFrom<u32> for SessionLength {
    type Error = String;

    fn try_from(secs: u32) -> Result<Self, Self::Error> {
        Self::from_secs(secs)
            .ok_or_else(|| format!("unsupported session length {secs}s, expected 15, 30 or 45"))
    }
}

impl From<SessionLength> for u32 {
    fn from(length: SessionLength) -> Self {
        length.secs()
    }
}

/// Commands the session understands, independent of key bindings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Quit,
    Reset,
    CycleDuration,
    ToggleLiveScore,
    Backspace,
    Character(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Command(Command),
    Tick,
}

/// What handling an event did to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Ignored,
    Typed,
    Erased,
    /// First accepted character, Idle -> Active
    Started,
    Ticked,
    /// Countdown reached zero, Active -> Finished
    Finished,
    Reset,
    Toggled,
    Quit,
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub word_count: usize,
    pub length: SessionLength,
    pub live_score: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            word_count: DEFAULT_WORD_COUNT,
            length: SessionLength::default(),
            live_score: false,
        }
    }
}

/// Read-only snapshot handed to rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionView<'a> {
    pub status: Status,
    pub typed: &'a str,
    pub target: &'a str,
    pub time_left: u32,
    pub duration: u32,
    pub live_score: bool,
    pub backspace_errors: u32,
}

/// The typing session state machine.
///
/// All mutation goes through [`Session::handle`], one event at a time.
#[derive(Debug)]
pub struct Session<R: Rng> {
    corpus: WordCorpus,
    rng: R,
    word_count: usize,
    length: SessionLength,
    live_score: bool,
    status: Status,
    time_left: u32,
    transcript: Transcript,
}

impl<R: Rng> Session<R> {
    pub fn new(corpus: WordCorpus, rng: R, config: SessionConfig) -> Self {
        let mut session = Self {
            corpus,
            rng,
            word_count: config.word_count,
            length: config.length,
            live_score: config.live_score,
            status: Status::Idle,
            time_left: config.length.secs(),
            transcript: Transcript::default(),
        };
        session.reset();
        session
    }

    pub fn handle(&mut self, event: Event) -> Effect {
        match event {
            Event::Tick => self.on_tick(),
            Event::Command(Command::Quit) => Effect::Quit,
            Event::Command(Command::Reset) => {
                self.reset();
                Effect::Reset
            }
            Event::Command(Command::CycleDuration) => {
                self.length = self.length.next();
                self.reset();
                Effect::Reset
            }
            Event::Command(Command::ToggleLiveScore) => {
                self.live_score = !self.live_score;
                Effect::Toggled
            }
            Event::Command(Command::Backspace) => self.on_key(Keystroke::Backspace),
            Event::Command(Command::Character(c)) => self.on_key(Keystroke::classify_char(c)),
        }
    }

    fn on_key(&mut self, key: Keystroke) -> Effect {
        match input::apply(&mut self.transcript, self.status, key) {
            InputOutcome::Appended(_) if self.status == Status::Idle => {
                self.status = Status::Active;
                Effect::Started
            }
            InputOutcome::Appended(_) => Effect::Typed,
            InputOutcome::Erased(_) => Effect::Erased,
            InputOutcome::Rejected => Effect::Ignored,
        }
    }

    fn on_tick(&mut self) -> Effect {
        if self.status != Status::Active {
            return Effect::Ignored;
        }

        self.time_left = self.time_left.saturating_sub(1);
        if self.time_left == 0 {
            self.status = Status::Finished;
            Effect::Finished
        } else {
            Effect::Ticked
        }
    }

    fn reset(&mut self) {
        let target = self.corpus.sample(self.word_count, &mut self.rng);
        self.transcript = Transcript::new(target);
        self.status = Status::Idle;
        self.time_left = self.length.secs();
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn length(&self) -> SessionLength {
        self.length
    }

    pub fn live_score(&self) -> bool {
        self.live_score
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn corpus(&self) -> &WordCorpus {
        &self.corpus
    }

    pub fn view(&self) -> SessionView<'_> {
        SessionView {
            status: self.status,
            typed: self.transcript.typed(),
            target: self.transcript.target(),
            time_left: self.time_left,
            duration: self.length.secs(),
            live_score: self.live_score,
            backspace_errors: self.transcript.backspace_errors(),
        }
    }

    pub fn score(&self) -> Score {
        scoring::score(
            self.transcript.typed(),
            self.transcript.target(),
            self.time_left,
            self.length.secs(),
            self.transcript.backspace_errors(),
        )
    }

    /// Replaces the sampled passage, for tests and custom prompts.
    pub fn set_target(&mut self, target: impl Into<String>) {
        self.transcript = Transcript::new(target.into());
        self.status = Status::Idle;
        self.time_left = self.length.secs();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rand::{rngs::StdRng, SeedableRng};

    fn session_with(words: &[&str], length: SessionLength, word_count: usize) -> Session<StdRng> {
        let corpus = WordCorpus::from_words("test", words).unwrap();
        Session::new(
            corpus,
            StdRng::seed_from_u64(11),
            SessionConfig {
                word_count,
                length,
                live_score: false,
            },
        )
    }

    fn cat_dog(length: SessionLength) -> Session<StdRng> {
        let mut s = session_with(&["cat", "dog"], length, 2);
        s.set_target("cat dog");
        s
    }

    fn type_str(s: &mut Session<StdRng>, text: &str) {
        for c in text.chars() {
            s.handle(Event::Command(Command::Character(c)));
        }
    }

    fn tick_n(s: &mut Session<StdRng>, n: u32) {
        for _ in 0..n {
            s.handle(Event::Tick);
        }
    }

    fn assert_invariants(s: &Session<StdRng>) {
        assert!(s.transcript().typed_len() <= s.transcript().target_len());
        assert!(s.time_left() <= s.length().secs());
    }

    #[test]
    fn test_new_session_is_idle() {
        let s = session_with(&["cat", "dog"], SessionLength::Thirty, 5);
        assert_eq!(s.status(), Status::Idle);
        assert_eq!(s.time_left(), 30);
        assert_eq!(s.transcript().typed(), "");
        assert_eq!(s.transcript().target().split(' ').count(), 5);
        assert!(!s.live_score());
    }

    #[test]
    fn test_first_char_starts_once() {
        let mut s = cat_dog(SessionLength::Thirty);

        assert_eq!(s.handle(Event::Command(Command::Character('c'))), Effect::Started);
        assert_eq!(s.status(), Status::Active);
        assert_eq!(s.handle(Event::Command(Command::Character('a'))), Effect::Typed);
        assert_eq!(s.handle(Event::Command(Command::Character('t'))), Effect::Typed);
        assert_eq!(s.status(), Status::Active);
    }

    #[test]
    fn test_idle_ignores_other_keys() {
        let mut s = cat_dog(SessionLength::Thirty);

        assert_eq!(s.handle(Event::Command(Command::Character('3'))), Effect::Ignored);
        assert_eq!(s.handle(Event::Command(Command::Character('?'))), Effect::Ignored);
        assert_eq!(s.status(), Status::Idle);
        assert_eq!(s.transcript().typed(), "");
    }

    #[test]
    fn test_backspace_in_idle_does_not_start() {
        let mut s = cat_dog(SessionLength::Thirty);

        assert_eq!(s.handle(Event::Command(Command::Backspace)), Effect::Erased);
        assert_eq!(s.status(), Status::Idle);
        assert_eq!(s.transcript().backspace_errors(), 1);
    }

    #[test]
    fn test_backspace_increments_errors_by_one() {
        let mut s = cat_dog(SessionLength::Thirty);
        type_str(&mut s, "ca");

        let before = s.transcript().backspace_errors();
        assert_eq!(s.handle(Event::Command(Command::Backspace)), Effect::Erased);
        assert_eq!(s.transcript().backspace_errors(), before + 1);
        assert_eq!(s.transcript().typed(), "c");
    }

    #[test]
    fn test_tick_while_idle_is_noop() {
        let mut s = cat_dog(SessionLength::Fifteen);

        assert_eq!(s.handle(Event::Tick), Effect::Ignored);
        assert_eq!(s.time_left(), 15);
        assert_eq!(s.status(), Status::Idle);
    }

    #[test]
    fn test_countdown_finishes_session() {
        let mut s = cat_dog(SessionLength::Fifteen);
        type_str(&mut s, "c");

        for _ in 0..14 {
            assert_eq!(s.handle(Event::Tick), Effect::Ticked);
        }
        assert_eq!(s.handle(Event::Tick), Effect::Finished);
        assert_eq!(s.status(), Status::Finished);
        assert_eq!(s.time_left(), 0);

        assert_eq!(s.handle(Event::Tick), Effect::Ignored);
        assert_eq!(s.time_left(), 0);
    }

    #[test]
    fn test_finished_rejects_typing() {
        let mut s = cat_dog(SessionLength::Fifteen);
        type_str(&mut s, "ca");
        tick_n(&mut s, 15);

        assert_eq!(s.handle(Event::Command(Command::Character('t'))), Effect::Ignored);
        assert_eq!(s.handle(Event::Command(Command::Backspace)), Effect::Ignored);
        assert_eq!(s.transcript().typed(), "ca");
        assert_eq!(s.transcript().backspace_errors(), 0);
    }

    #[test]
    fn test_typing_capped_at_target_length() {
        let mut s = cat_dog(SessionLength::Thirty);
        type_str(&mut s, "cat dog and more");

        assert_eq!(s.transcript().typed(), "cat dog");
        assert_invariants(&s);
    }

    #[test]
    fn test_reset_mid_session() {
        let mut s = session_with(&["alpha", "beta", "gamma"], SessionLength::Thirty, 4);
        type_str(&mut s, "ab");
        s.handle(Event::Command(Command::Backspace));
        tick_n(&mut s, 3);

        assert_eq!(s.handle(Event::Command(Command::Reset)), Effect::Reset);
        assert_eq!(s.status(), Status::Idle);
        assert_eq!(s.transcript().typed(), "");
        assert_eq!(s.transcript().backspace_errors(), 0);
        assert_eq!(s.time_left(), 30);
        assert_eq!(s.transcript().target().split(' ').count(), 4);

        // the next character starts a new segment
        let c = s.transcript().expected(0).unwrap();
        assert_eq!(s.handle(Event::Command(Command::Character(c))), Effect::Started);
    }

    #[test]
    fn test_reset_after_finish() {
        let mut s = cat_dog(SessionLength::Fifteen);
        type_str(&mut s, "c");
        tick_n(&mut s, 15);
        assert_eq!(s.status(), Status::Finished);

        s.handle(Event::Command(Command::Reset));
        assert_eq!(s.status(), Status::Idle);
        assert_eq!(s.time_left(), 15);
    }

    #[test]
    fn test_duration_cycle_from_thirty() {
        let mut s = cat_dog(SessionLength::Thirty);
        let mut seen = vec![s.length().secs()];
        for _ in 0..3 {
            assert_eq!(s.handle(Event::Command(Command::CycleDuration)), Effect::Reset);
            seen.push(s.length().secs());
            assert_eq!(s.time_left(), s.length().secs());
            assert_eq!(s.status(), Status::Idle);
        }
        assert_eq!(seen, vec![30, 45, 15, 30]);
    }

    #[test]
    fn test_duration_cycle_resets_progress() {
        let mut s = cat_dog(SessionLength::Thirty);
        type_str(&mut s, "cat");
        s.handle(Event::Command(Command::Backspace));
        tick_n(&mut s, 2);

        s.handle(Event::Command(Command::CycleDuration));
        assert_eq!(s.transcript().typed(), "");
        assert_eq!(s.transcript().backspace_errors(), 0);
        assert_eq!(s.time_left(), 45);
    }

    #[test]
    fn test_toggle_live_score_keeps_state() {
        let mut s = cat_dog(SessionLength::Thirty);
        type_str(&mut s, "ca");
        tick_n(&mut s, 2);

        assert_eq!(s.handle(Event::Command(Command::ToggleLiveScore)), Effect::Toggled);
        assert!(s.live_score());
        assert_eq!(s.status(), Status::Active);
        assert_eq!(s.transcript().typed(), "ca");
        assert_eq!(s.time_left(), 28);

        s.handle(Event::Command(Command::ToggleLiveScore));
        assert!(!s.live_score());
    }

    #[test]
    fn test_quit_leaves_state_alone() {
        let mut s = cat_dog(SessionLength::Thirty);
        type_str(&mut s, "c");
        assert_matches!(s.handle(Event::Command(Command::Quit)), Effect::Quit);
        assert_eq!(s.status(), Status::Active);
    }

    #[test]
    fn test_exact_passage_score() {
        let mut s = cat_dog(SessionLength::Fifteen);
        type_str(&mut s, "cat dog");
        tick_n(&mut s, 15);

        let score = s.score();
        assert_eq!(score.accuracy, 1.0);
        assert_eq!(score.wpm, 8.0);
    }

    #[test]
    fn test_one_mismatch_score() {
        let mut s = cat_dog(SessionLength::Fifteen);
        type_str(&mut s, "cbt dog");
        tick_n(&mut s, 15);

        let score = s.score();
        assert!((score.accuracy - 6.0 / 7.0).abs() < 1e-12);
        assert_eq!(score.wpm, 6.9);
    }

    #[test]
    fn test_invariants_hold_through_mixed_events() {
        let mut s = session_with(&["a", "bb", "ccc"], SessionLength::Fifteen, 3);
        let events = [
            Event::Tick,
            Event::Command(Command::Character('a')),
            Event::Command(Command::Backspace),
            Event::Command(Command::Backspace),
            Event::Command(Command::Character('x')),
            Event::Command(Command::Character('y')),
            Event::Tick,
            Event::Command(Command::CycleDuration),
            Event::Command(Command::Character('q')),
            Event::Tick,
        ];
        for round in 0..40 {
            for e in events {
                s.handle(e);
                assert_invariants(&s);
            }
            for c in "abcdefghijklmnop".chars() {
                s.handle(Event::Command(Command::Character(c)));
                assert_invariants(&s);
            }
            if round % 7 == 0 {
                s.handle(Event::Command(Command::Reset));
            }
        }
    }

    #[test]
    fn test_view_snapshot() {
        let mut s = cat_dog(SessionLength::Thirty);
        type_str(&mut s, "ca");
        s.handle(Event::Command(Command::Backspace));

        let view = s.view();
        assert_eq!(view.status, Status::Active);
        assert_eq!(view.typed, "c");
        assert_eq!(view.target, "cat dog");
        assert_eq!(view.time_left, 30);
        assert_eq!(view.duration, 30);
        assert_eq!(view.backspace_errors, 1);
        assert!(!view.live_score);
    }

    #[test]
    fn test_session_length_serde() {
        assert_eq!(serde_json::to_string(&SessionLength::FortyFive).unwrap(), "45");
        let parsed: SessionLength = serde_json::from_str("15").unwrap();
        assert_eq!(parsed, SessionLength::Fifteen);
        assert!(serde_json::from_str::<SessionLength>("20").is_err());
    }

    #[test]
    fn test_status_display() {
        assert_eq!(Status::Idle.to_string(), "idle");
        assert_eq!(Status::Finished.to_string(), "finished");
    }
}
