/*!
This module holds the mutable state of one round of play and the scoring
and leveling rules.
*/

use std::time::Duration;

use rand_chacha::rand_core::SeedableRng;

use crate::{Event, GameRng, GameState, MenuItem, Piece, Score, Well};

/// Default well width.
pub const WELL_WIDTH: usize = 10;
/// Default well height.
pub const WELL_HEIGHT: usize = 20;

/// Points awarded for clearing 1 to 4 lines at once, before the
/// `(level + 1)` multiplier.
const LINE_POINTS: [u32; 5] = [0, 40, 100, 300, 1200];

/// Milliseconds per gravity step, indexed by level; levels past the end
/// use the last entry.
#[rustfmt::skip]
const GRAVITY_MS: [u64; 20] = [
    800, 717, 633, 550, 467, 383, 300, 217, 133, 100,
     83,  83,  83,  67,  67,  67,  50,  50,  50,  33,
];

/// Mutable state of a round of play, owned by [`crate::Game`] and mutated
/// only from [`crate::Game::update`].
///
/// A session lives for the whole application run; [`Session::reset`]
/// replaces the round-scoped parts wholesale when a new round starts while
/// the PRNG carries on, so consecutive rounds see fresh piece sequences.
#[derive(Eq, PartialEq, Clone, Debug)]
pub struct Session {
    /// Which top-level state is active.
    pub state: GameState,
    /// The running score record.
    pub score: Score,
    /// The playing-field grid.
    pub well: Well,
    /// The piece currently falling, if a round is underway.
    pub piece: Option<Piece>,
    /// The piece that will spawn next, positioned beside the well.
    pub preview: Option<Piece>,
    /// The selected title-menu entry.
    pub menu_cursor: MenuItem,
    /// Time between two gravity steps at the current level.
    pub gravity_interval: Duration,
    /// Time accumulated towards the next gravity step.
    pub gravity_time: Duration,
    /// Time accumulated towards the end of the line-clear animation.
    pub clear_time: Duration,
    /// Completed rows waiting (marked) for the clear delay to elapse.
    pub pending_clear: Vec<usize>,
    /// The PRNG feeding piece generation.
    pub rng: GameRng,
}

impl Session {
    /// A fresh session sitting at the title menu.
    pub fn new(seed: u64) -> Self {
        Self {
            state: GameState::Menu,
            score: Score::default(),
            well: Well::new(WELL_WIDTH, WELL_HEIGHT),
            piece: None,
            preview: None,
            menu_cursor: MenuItem::Play,
            gravity_interval: Self::gravity_for_level(0),
            gravity_time: Duration::ZERO,
            clear_time: Duration::ZERO,
            pending_clear: Vec::new(),
            rng: GameRng::seed_from_u64(seed),
        }
    }

    /// Reinitializes everything round-scoped for a new game. The PRNG is
    /// deliberately kept, so replaying "Play" continues the seeded piece
    /// stream instead of repeating it.
    pub fn reset(&mut self) {
        self.score = Score::default();
        self.well = Well::new(WELL_WIDTH, WELL_HEIGHT);
        self.piece = None;
        self.preview = None;
        self.menu_cursor = MenuItem::Play;
        self.gravity_interval = Self::gravity_for_level(0);
        self.gravity_time = Duration::ZERO;
        self.clear_time = Duration::ZERO;
        self.pending_clear.clear();
    }

    /// The gravity interval for a level, clamped to the table's last entry
    /// for any level beyond it.
    pub fn gravity_for_level(level: u32) -> Duration {
        let idx = (level as usize).min(GRAVITY_MS.len() - 1);
        Duration::from_millis(GRAVITY_MS[idx])
    }

    /// Awards points for `lines` (1 to 4) simultaneously cleared rows,
    /// advances the line total and level, and speeds gravity up on a level
    /// increase. Emits score/level/line events for the presentation layer.
    pub fn add_score_and_level(&mut self, lines: u32, events: &mut Vec<Event>) {
        if !(1..=4).contains(&lines) {
            return;
        }
        self.score.points += LINE_POINTS[lines as usize] * (self.score.level + 1);
        self.score.lines += lines;

        // Level up every 10 lines.
        let new_level = self.score.lines / 10;
        if new_level > self.score.level {
            self.score.level = new_level;
            self.gravity_interval = Self::gravity_for_level(new_level);
            events.push(Event::LevelChanged(new_level));
        }
        events.push(Event::ScoreChanged(self.score.points));
        events.push(Event::LinesCleared(lines));
    }
}
