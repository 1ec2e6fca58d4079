mod menus;

use std::{
    fs::File,
    io::{self, Read, Write},
    path::PathBuf,
};

use crossterm::{cursor, event::KeyboardEnhancementFlags, style, terminal, ExecutableCommand};

use quadfall_engine::{Event, Game, GameState, Score};

use crate::keybinds::{default_keybinds, Keybinds};

/// One line of the persisted scoreboard.
#[derive(PartialEq, Eq, Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct ScoreboardEntry {
    pub datetime: String,
    pub score: Score,
}

/// The persisted highscore list: best rounds first, at most
/// [`Scoreboard::MAX_ENTRIES`] of them.
#[derive(PartialEq, Eq, Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct Scoreboard {
    entries: Vec<ScoreboardEntry>,
}

impl Scoreboard {
    pub const MAX_ENTRIES: usize = 3;

    pub fn entries(&self) -> &[ScoreboardEntry] {
        &self.entries
    }

    pub fn add(&mut self, entry: ScoreboardEntry) {
        self.entries.push(entry);
        self.entries
            .sort_by(|a, b| b.score.points.cmp(&a.score.points));
        self.entries.truncate(Self::MAX_ENTRIES);
    }
}

/// What a screen asks the run loop to do once it returns.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub(crate) enum ScreenUpdate {
    /// Re-dispatch on the (possibly changed) game state.
    Continue,
    /// Stop the application.
    Quit,
}

#[derive(PartialEq, Debug)]
pub struct Application<T: Write> {
    pub(crate) term: T,
    pub(crate) kitty_enabled: bool,
    pub(crate) game: Game,
    pub(crate) scoreboard: Scoreboard,
    pub(crate) keybinds: Keybinds,
}

impl<T: Write> Drop for Application<T> {
    fn drop(&mut self) {
        // (Try to) undo terminal setup.
        let _ = terminal::disable_raw_mode();
        let _ = self.term.execute(style::ResetColor);
        let _ = self.term.execute(cursor::Show);
        let _ = self.term.execute(terminal::LeaveAlternateScreen);

        // Persist the scoreboard using the file system.
        if let Err(e) = self.store_scoreboard(Self::savefile_path()) {
            eprintln!("{e}");
        }
    }
}

impl<T: Write> Application<T> {
    pub const W_MAIN: u16 = 62;
    pub const H_MAIN: u16 = 23;

    pub const SAVEFILE_NAME: &'static str =
        concat!(".quadfall_", clap::crate_version!(), "_scores.json");

    pub const KEYBOARD_ENHANCEMENT_FLAGS: KeyboardEnhancementFlags =
        KeyboardEnhancementFlags::all();

    pub fn new(mut term: T, seed: Option<u64>) -> Self {
        // Console prologue: Initialization.
        let _v = term.execute(terminal::EnterAlternateScreen);
        let _v = term.execute(terminal::SetTitle("Quadfall"));
        let _v = term.execute(cursor::Hide);
        let _v = terminal::enable_raw_mode();

        let mut app = Self {
            term,
            kitty_enabled: false,
            game: seed.map(Game::new).unwrap_or_default(),
            scoreboard: Scoreboard::default(),
            keybinds: default_keybinds(),
        };

        // Actually load in past highscores.
        if app.load_scoreboard(Self::savefile_path()).is_err() {
            // Missing or unreadable savefile: play with an empty scoreboard.
        }

        // With press/release events available we can do our own auto-shift.
        app.kitty_enabled = terminal::supports_keyboard_enhancement().unwrap_or(false);
        app
    }

    pub(crate) fn fetch_main_xy() -> (u16, u16) {
        let (w_console, h_console) = terminal::size().unwrap_or((0, 0));
        (
            w_console.saturating_sub(Self::W_MAIN) / 2,
            h_console.saturating_sub(Self::H_MAIN) / 2,
        )
    }

    fn savefile_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::SAVEFILE_NAME)
    }

    fn store_scoreboard(&self, path: PathBuf) -> io::Result<()> {
        let save_str = serde_json::to_string(&self.scoreboard)?;
        let mut file = File::create(path)?;
        file.write_all(save_str.as_bytes())
    }

    fn load_scoreboard(&mut self, path: PathBuf) -> io::Result<()> {
        let mut file = File::open(path)?;
        let mut save_str = String::new();
        file.read_to_string(&mut save_str)?;
        self.scoreboard = serde_json::from_str(&save_str)?;
        Ok(())
    }

    /// Folds engine events into application state. Returns the screen
    /// update the events demand, if any.
    pub(crate) fn note_events(&mut self, events: &[Event]) -> Option<ScreenUpdate> {
        for event in events {
            match event {
                Event::GameOver => {
                    self.scoreboard.add(ScoreboardEntry {
                        datetime: chrono::Local::now().format("%Y-%m-%d %H:%M").to_string(),
                        score: self.game.session().score,
                    });
                    // Memory keeps the entry even if the disk write fails.
                    let _v = self.store_scoreboard(Self::savefile_path());
                }
                Event::Quit => return Some(ScreenUpdate::Quit),
                _ => {}
            }
        }
        None
    }

    pub fn run(&mut self) -> io::Result<()> {
        loop {
            // Open the screen matching the engine's state; the engine alone
            // decides transitions, screens merely feed it commands.
            let screen_update = match self.game.state() {
                GameState::Menu => self.run_screen_title(),
                GameState::Highscores => self.run_screen_highscores(),
                GameState::Playing => self.run_screen_play(),
                GameState::Paused => self.run_screen_pause(),
                GameState::GameOver => self.run_screen_game_over(),
            }?;

            match screen_update {
                ScreenUpdate::Continue => {}
                ScreenUpdate::Quit => break,
            }
        }

        Ok(())
    }
}
