use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use crate::corpus::WordCorpus;
use crate::runtime::AppEvent;
use crate::session::{Command, Effect, Event, Session, SessionConfig, Status};
use crate::timer::Timer;

/// Maps a terminal key to a session command.
///
/// Esc and Ctrl+C quit, Enter restarts, `1` cycles the duration and `2`
/// toggles the live wpm readout. Ctrl and Alt chords are dropped; every
/// other character is handed to the session, which decides whether it can
/// be typed.
pub fn map_key(key: KeyEvent) -> Option<Command> {
    match key.code {
        KeyCode::Esc => Some(Command::Quit),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Command::Quit),
        KeyCode::Enter => Some(Command::Reset),
        KeyCode::Backspace => Some(Command::Backspace),
        KeyCode::Char('1') => Some(Command::CycleDuration),
        KeyCode::Char('2') => Some(Command::ToggleLiveScore),
        KeyCode::Char(_) if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
            None
        }
        KeyCode::Char(c) => Some(Command::Character(c)),
        _ => None,
    }
}

/// Single-threaded dispatcher: every event goes through [`App::dispatch`]
#[derive(Debug)]
pub struct App {
    pub session: Session<StdRng>,
    pub timer: Timer,
    should_quit: bool,
}

impl App {
    pub fn new(corpus: WordCorpus, config: SessionConfig, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_timer(Session::new(corpus, rng, config), Timer::default())
    }

    pub fn with_timer(session: Session<StdRng>, timer: Timer) -> Self {
        Self {
            session,
            timer,
            should_quit: false,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Applies one event and keeps the timer in step with the session status.
    pub fn dispatch(&mut self, event: AppEvent, now: Instant) -> Effect {
        let event = match event {
            AppEvent::Tick => Event::Tick,
            AppEvent::Key(key) => match map_key(key) {
                Some(command) => Event::Command(command),
                None => return Effect::Ignored,
            },
            AppEvent::Resize => return Effect::Ignored,
            AppEvent::Closed => {
                warn!(status = %self.session.status(), "input closed, quitting");
                self.should_quit = true;
                return Effect::Quit;
            }
        };

        let before = self.session.status();
        let effect = self.session.handle(event);
        self.timer.sync(self.session.status(), now);

        match effect {
            Effect::Started | Effect::Finished | Effect::Reset => {
                let score = self.session.score();
                info!(
                    from = %before,
                    to = %self.session.status(),
                    duration = self.session.length().secs(),
                    wpm = score.wpm,
                    accuracy = score.accuracy,
                    "session transition"
                );
            }
            Effect::Quit => {
                info!(status = %before, "quit requested");
                self.should_quit = true;
            }
            Effect::Toggled => {
                debug!(live_score = self.session.live_score(), "live score toggled")
            }
            Effect::Ticked => debug!(time_left = self.session.time_left(), "tick"),
            Effect::Typed | Effect::Erased | Effect::Ignored => {}
        }

        effect
    }

    pub fn is_running(&self) -> bool {
        self.session.status() == Status::Active
    }
}
