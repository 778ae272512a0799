use clap::builder::TypedValueParser;
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use keysprint::{
    app::App,
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    logging,
    runtime::{CrosstermEventSource, Runner},
    session::SessionLength,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::Instant,
};
use tracing::{info, warn};

/// timed typing trainer for the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Type a passage of random words against a 15, 30 or 45 second countdown and get your words per minute and accuracy at the end."
)]
pub struct Cli {
    /// number of words in the passage
    #[clap(
        short = 'w',
        long = "words",
        value_parser = clap::value_parser!(u64).range(1..).map(|n| n as usize)
    )]
    number_of_words: Option<usize>,

    /// session length in seconds: 15, 30 or 45
    #[clap(short = 'd', long, value_parser = parse_length)]
    duration: Option<SessionLength>,

    /// file with one word per line to build passages from
    #[clap(short = 'f', long)]
    words_file: Option<PathBuf>,

    /// built-in word list to build passages from
    #[clap(short = 'l', long)]
    language: Option<String>,

    /// show wpm while typing
    #[clap(long)]
    live_wpm: bool,

    /// seed for reproducible passages
    #[clap(long)]
    seed: Option<u64>,

    /// config file to use instead of the default location
    #[clap(long)]
    config: Option<PathBuf>,

    /// log file to write to instead of the default location
    #[clap(long)]
    log_file: Option<PathBuf>,
}

fn parse_length(s: &str) -> Result<SessionLength, String> {
    let secs: u32 = s
        .parse()
        .map_err(|_| format!("`{s}` is not a number of seconds"))?;
    SessionLength::try_from(secs)
}

impl Cli {
    /// Command line flags take precedence over the stored config
    fn apply(&self, mut config: Config) -> Config {
        if let Some(words) = self.number_of_words {
            config.word_count = words;
        }
        if let Some(duration) = self.duration {
            config.duration = duration;
        }
        if let Some(ref path) = self.words_file {
            config.words_file = Some(path.clone());
        }
        if let Some(ref language) = self.language {
            config.language = language.clone();
            config.words_file = self.words_file.clone();
        }
        if self.live_wpm {
            config.live_score = true;
        }
        config
    }

    fn config_store(&self) -> FileConfigStore {
        match self.config {
            Some(ref path) => FileConfigStore::with_path(path),
            None => FileConfigStore::new(),
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let _log_guard = match cli.log_file.clone().or_else(AppDirs::log_path) {
        Some(path) => logging::init(&path)?,
        None => None,
    };

    let store = cli.config_store();
    let config = cli.apply(store.load());

    let corpus = match config.load_corpus() {
        Ok(corpus) => corpus,
        Err(err) => {
            tracing::error!(%err, "cannot start a session");
            let mut cmd = Cli::command();
            cmd.error(ErrorKind::InvalidValue, err).exit();
        }
    };
    info!(corpus = corpus.name(), words = corpus.len(), "word list loaded");

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let mut app = App::new(corpus, config.session_config(), cli.seed);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = store.save_preferences(app.session.length(), app.session.live_score()) {
        warn!(%err, path = %store.path().display(), "could not save preferences");
    }

    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(CrosstermEventSource::new());

    terminal.draw(|f| ui(app, f))?;

    while !app.should_quit() {
        let Some(event) = runner.step(&mut app.timer) else {
            continue;
        };
        app.dispatch(event, Instant::now());
        terminal.draw(|f| ui(app, f))?;
    }

    Ok(())
}

fn ui(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}
