/*!
# Quadfall Engine

`quadfall_engine` is the deterministic logic core of a classic falling-block
puzzle game: the well grid, piece representation and rotation, collision and
locking, line-clear sequencing, scoring and leveling, and the top-level
state machine (menu, playing, paused, game over) that decides which inputs
are legal at any moment.

The engine is advanced exclusively through [`Game::update`], which receives
the elapsed time of one fixed tick plus the commands that became active
during it, and returns the [`Event`]s that occurred. Presentation layers
read [`Game::session`] afterwards and never mutate engine state.

# Examples

```
use quadfall_engine::{Command, Game, GameState};
use std::time::Duration;

// A fresh game starts at the title menu; selecting the first entry
// ("Play") starts a round and spawns the first piece.
let mut game = Game::new(42);
game.update(Duration::ZERO, &[Command::Select]);
assert_eq!(game.state(), GameState::Playing);

// Advance the game by one tick in which 'move left' was pressed.
game.update(Duration::from_millis(16), &[Command::MoveLeft]);

// Read most recent state; this is how a UI knows what to render.
let session = game.session();
assert!(session.piece.is_some());
```
*/

#![warn(missing_docs)]

mod game_update;
mod piece;
mod session;
mod well;

use std::{error, fmt, ops, time::Duration};

use rand_chacha::ChaCha12Rng;

pub use piece::{Piece, PieceKind, PIECE_TILES};
pub use session::{Session, WELL_HEIGHT, WELL_WIDTH};
pub use well::{Cell, Well};

/// The internal PRNG used by a game; the same seed replays the same pieces.
pub type GameRng = ChaCha12Rng;

/// The type of a piece's square occupancy matrix.
pub type TileMatrix = [[bool; PIECE_TILES]; PIECE_TILES];

/// How long completed rows stay marked on the board before they are
/// physically removed and the next piece spawns.
pub const LINE_CLEAR_DELAY: Duration = Duration::from_millis(200);

/// The top-level states a game can be in. Exactly one is active, and only
/// the engine itself transitions between them.
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Copy, Hash, Debug)]
pub enum GameState {
    /// Title menu, navigated with [`Command::MenuUp`]/[`Command::MenuDown`].
    Menu,
    /// The read-only highscore listing.
    Highscores,
    /// A round is underway and gameplay commands are legal.
    Playing,
    /// A round is underway but frozen; timers do not advance.
    Paused,
    /// The last round ended because a piece had no room to spawn.
    GameOver,
}

/// An entry of the title menu.
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Copy, Hash, Debug)]
pub enum MenuItem {
    /// Start a new round.
    Play = 0,
    /// Show the highscore listing.
    Highscores,
    /// Quit the application (the engine only reports [`Event::Quit`]).
    Exit,
}

impl MenuItem {
    /// All `MenuItem` enum variants in order.
    pub const VARIANTS: [Self; 3] = [Self::Play, Self::Highscores, Self::Exit];

    /// The entry above `self`; the cursor saturates at the top.
    #[must_use]
    pub fn up(self) -> Self {
        Self::VARIANTS[(self as usize).saturating_sub(1)]
    }

    /// The entry below `self`; the cursor saturates at the bottom.
    #[must_use]
    pub fn down(self) -> Self {
        Self::VARIANTS[(self as usize + 1).min(Self::VARIANTS.len() - 1)]
    }
}

/// An abstract input intent handed to [`Game::update`].
///
/// Commands are edge-triggered: the input layer emits one command per fresh
/// key-down transition (plus auto-repeats for the movement commands, which
/// are the input layer's business). A command that is not legal in the
/// current [`GameState`] is silently ignored.
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Copy, Hash, Debug)]
pub enum Command {
    /// Move the falling piece one column to the left.
    MoveLeft = 0,
    /// Move the falling piece one column to the right.
    MoveRight,
    /// Move the falling piece down by one row, locking it if blocked.
    SoftDrop,
    /// Rotate the falling piece by 90°, trying the in-place position and
    /// then a one-column kick to the right and to the left.
    Rotate,
    /// Drop the falling piece to the last free row and schedule its lock.
    HardDrop,
    /// Freeze the current round.
    Pause,
    /// Unfreeze the current round.
    Resume,
    /// Move the title-menu cursor up.
    MenuUp,
    /// Move the title-menu cursor down.
    MenuDown,
    /// Activate the current title-menu entry, or confirm a screen.
    Select,
    /// Leave a sub-screen.
    Back,
    /// Abandon the current screen (paused round back to the menu).
    Escape,
}

impl Command {
    /// All `Command` enum variants in order.
    ///
    /// Note that `Command::VARIANTS[c as usize] == c` always holds.
    pub const VARIANTS: [Self; 12] = {
        use Command as C;
        [
            C::MoveLeft,
            C::MoveRight,
            C::SoftDrop,
            C::Rotate,
            C::HardDrop,
            C::Pause,
            C::Resume,
            C::MenuUp,
            C::MenuDown,
            C::Select,
            C::Back,
            C::Escape,
        ]
    };
}

impl<T> ops::Index<Command> for [T; Command::VARIANTS.len()] {
    type Output = T;

    fn index(&self, idx: Command) -> &Self::Output {
        &self[idx as usize]
    }
}

impl<T> ops::IndexMut<Command> for [T; Command::VARIANTS.len()] {
    fn index_mut(&mut self, idx: Command) -> &mut Self::Output {
        &mut self[idx as usize]
    }
}

/// Something that happened during a call to [`Game::update`].
///
/// Events exist for the presentation layer; no engine logic depends on
/// anyone consuming them.
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Copy, Hash, Debug)]
pub enum Event {
    /// The falling piece was written permanently into the well.
    PieceLocked,
    /// This many rows were completed by the locked piece.
    LinesCleared(u32),
    /// The total score changed to this value.
    ScoreChanged(u32),
    /// The level increased to this value (gravity sped up accordingly).
    LevelChanged(u32),
    /// A piece had no room to spawn; the round is over.
    GameOver,
    /// "Exit" was selected in the title menu.
    Quit,
}

/// The record a round of play accumulates.
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Copy, Hash, Default, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Score {
    /// Points awarded for line clears so far.
    pub points: u32,
    /// Current level, `lines / 10`.
    pub level: u32,
    /// Total number of lines cleared.
    pub lines: u32,
}

/// Error returned by [`Well::tile`] for coordinates outside the grid.
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Copy, Hash, Debug)]
pub struct OutOfRange {
    /// The offending column.
    pub x: i32,
    /// The offending row.
    pub y: i32,
}

impl fmt::Display for OutOfRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "coordinates ({}, {}) lie outside the well", self.x, self.y)
    }
}

impl error::Error for OutOfRange {}

/// Main game struct representing the logic side of the application.
///
/// The [`Session`] it owns is mutated only from [`Game::update`];
/// everything else reads it through [`Game::session`].
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Game {
    session: Session,
}

impl Game {
    /// Creates a game sitting at the title menu, with its PRNG seeded so
    /// that the piece sequence of the coming rounds is reproducible.
    pub fn new(seed: u64) -> Self {
        Self {
            session: Session::new(seed),
        }
    }

    /// Creates a game resuming from a prepared session, e.g. one with a
    /// custom starting well.
    pub fn from_session(session: Session) -> Self {
        Self { session }
    }

    /// Read accessor for the current game state.
    pub fn state(&self) -> GameState {
        self.session.state
    }

    /// Read accessor for the round's mutable state.
    pub const fn session(&self) -> &Session {
        &self.session
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new(rand::random())
    }
}
