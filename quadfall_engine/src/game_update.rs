/*!
This module handles what happens when [`Game::update`] is called: command
dispatch per state, the gravity/lock/spawn sequence, and the line-clear
animation window.
*/

use std::time::Duration;

use crate::{
    Command, Event, Game, GameState, MenuItem, Piece, Session, LINE_CLEAR_DELAY, PIECE_TILES,
};

impl Game {
    /// The main function used to advance the game state by one fixed tick.
    ///
    /// `elapsed` is the wall-clock time since the previous call and
    /// `commands` are the input intents that became active during it, in
    /// order. Commands that are not legal in the current [`GameState`] are
    /// ignored. While a line-clear animation is pending, time alone
    /// advances the game and no commands are processed at all.
    ///
    /// Returns the [`Event`]s caused by this tick, in the order they
    /// occurred.
    pub fn update(&mut self, elapsed: Duration, commands: &[Command]) -> Vec<Event> {
        let mut events = Vec::new();

        // Completed rows flash until the clear delay elapses; the well is
        // only then physically collapsed and the next piece spawned.
        if self.session.state == GameState::Playing && !self.session.pending_clear.is_empty() {
            self.session.clear_time += elapsed;
            if self.session.clear_time >= LINE_CLEAR_DELAY {
                let rows = std::mem::take(&mut self.session.pending_clear);
                self.session.well.clear(&rows);
                self.session.gravity_time = Duration::ZERO;
                self.session.clear_time = Duration::ZERO;
                self.spawn_piece(&mut events);
            }
            return events;
        }

        for &command in commands {
            self.apply_command(command, &mut events);
        }

        // A command may have locked the piece (pending rows) or left the
        // Playing state; gravity only advances an unobstructed round.
        if self.session.state == GameState::Playing && self.session.pending_clear.is_empty() {
            // The threshold check precedes accumulation. Commands run
            // before this check, so a hard drop's forced accumulator makes
            // the lock attempt happen within the same call.
            if self.session.gravity_time >= self.session.gravity_interval {
                self.session.gravity_time = Duration::ZERO;
                self.translate_piece(0, 1, &mut events);
            }
            self.session.gravity_time += elapsed;
        }

        events
    }

    fn apply_command(&mut self, command: Command, events: &mut Vec<Event>) {
        use Command as C;
        use GameState as S;

        match (self.session.state, command) {
            (S::Menu, C::MenuUp) => self.session.menu_cursor = self.session.menu_cursor.up(),
            (S::Menu, C::MenuDown) => self.session.menu_cursor = self.session.menu_cursor.down(),
            (S::Menu, C::Select) => match self.session.menu_cursor {
                MenuItem::Play => self.start_round(events),
                MenuItem::Highscores => self.session.state = S::Highscores,
                MenuItem::Exit => events.push(Event::Quit),
            },
            (S::Menu, C::Back | C::Escape) => self.session.menu_cursor = MenuItem::Exit,

            (S::Highscores, C::Select | C::Back | C::Escape) => self.session.state = S::Menu,

            (S::Playing, C::MoveLeft) => self.translate_piece(-1, 0, events),
            (S::Playing, C::MoveRight) => self.translate_piece(1, 0, events),
            (S::Playing, C::SoftDrop) => self.translate_piece(0, 1, events),
            (S::Playing, C::Rotate) => self.rotate_piece(),
            (S::Playing, C::HardDrop) => self.hard_drop(),
            (S::Playing, C::Pause) => self.session.state = S::Paused,

            (S::Paused, C::Resume) => self.session.state = S::Playing,
            (S::Paused, C::Escape) => self.session.state = S::Menu,

            (S::GameOver, C::Select | C::Escape) => self.session.state = S::Menu,

            // Anything else is not legal right now; not an error.
            _ => {}
        }
    }

    /// Starts a fresh round: new well and score, first preview, first spawn.
    fn start_round(&mut self, events: &mut Vec<Event>) {
        self.session.reset();
        self.session.state = GameState::Playing;
        self.session.preview = Some(Piece::random(&mut self.session.rng));
        self.spawn_piece(events);
    }

    /// Moves the falling piece if the target cells are free. A blocked
    /// downward step is the lock trigger; blocked sideways steps are no-ops.
    fn translate_piece(&mut self, dx: i32, dy: i32, events: &mut Vec<Event>) {
        let Some(mut piece) = self.session.piece else {
            return;
        };
        if !self.session.well.collision(&piece, dx, dy) {
            piece.x += dx;
            piece.y += dy;
            self.session.piece = Some(piece);
        } else if dy == 1 {
            self.lock_piece(events);
        }
    }

    /// Tries the rotated piece in place, then kicked one column right, then
    /// one column left; the first fit wins, otherwise the piece stays.
    fn rotate_piece(&mut self) {
        let Some(piece) = self.session.piece else {
            return;
        };
        let candidate = Piece {
            tiles: piece.rotated(),
            ..piece
        };
        for kick in [0, 1, -1] {
            if !self.session.well.collision(&candidate, kick, 0) {
                self.session.piece = Some(Piece {
                    x: piece.x + kick,
                    ..candidate
                });
                return;
            }
        }
    }

    /// Teleports the piece to the last non-colliding row and forces the
    /// gravity accumulator to its threshold, so the gravity step following
    /// command processing immediately attempts the lock.
    fn hard_drop(&mut self) {
        let Some(mut piece) = self.session.piece else {
            return;
        };
        while !self.session.well.collision(&piece, 0, 0) {
            piece.y += 1;
        }
        piece.y -= 1;
        self.session.piece = Some(piece);
        self.session.gravity_time = self.session.gravity_interval;
    }

    /// Writes the piece into the well, then either spawns the next piece
    /// right away or scores and marks the completed rows and enters the
    /// clear-animation window.
    fn lock_piece(&mut self, events: &mut Vec<Event>) {
        let Some(piece) = self.session.piece.take() else {
            return;
        };
        self.session.clear_time = Duration::ZERO;
        self.session.gravity_time = Duration::ZERO;

        self.session.well.land(&piece);
        events.push(Event::PieceLocked);

        let full_rows = self.session.well.lines_cleared();
        if full_rows.is_empty() {
            self.spawn_piece(events);
        } else {
            self.session
                .add_score_and_level(full_rows.len() as u32, events);
            for &row in &full_rows {
                self.session.well.mark_row(row);
            }
            self.session.pending_clear = full_rows;
        }
    }

    /// Promotes the preview to the falling piece at the spawn position and
    /// generates a new preview. A spawn position that already collides is
    /// the game-over condition.
    fn spawn_piece(&mut self, events: &mut Vec<Event>) {
        let Session {
            well, rng, preview, ..
        } = &mut self.session;
        let mut piece = preview.take().unwrap_or_else(|| Piece::random(rng));
        piece.x = well.width() as i32 / 2;
        piece.y = 0;

        // Shift down by the distance from the matrix center to the first
        // occupied row, so top-heavy shapes still appear at the top edge.
        let center = PIECE_TILES / 2;
        for row in 0..=center {
            if piece.tiles[row].iter().any(|&occupied| occupied) {
                piece.y += (center as i32 - row as i32).abs();
                break;
            }
        }

        if well.collision(&piece, 0, 0) {
            // No room left: the round ends with the blocked piece in view.
            self.session.piece = Some(piece);
            self.session.state = GameState::GameOver;
            events.push(Event::GameOver);
            return;
        }
        self.session.piece = Some(piece);

        let mut next = Piece::random(&mut self.session.rng);
        next.x = self.session.well.width() as i32 + 3;
        next.y = 2;
        self.session.preview = Some(next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Cell, PieceKind, WELL_HEIGHT, WELL_WIDTH};

    /// A game mid-round with a chosen falling piece, bypassing the RNG.
    fn playing_game_with(kind: PieceKind) -> Game {
        let mut session = Session::new(1);
        session.state = GameState::Playing;
        let mut piece = Piece::new(kind);
        piece.x = WELL_WIDTH as i32 / 2;
        piece.y = 2;
        session.piece = Some(piece);
        Game::from_session(session)
    }

    fn tick(game: &mut Game, commands: &[Command]) -> Vec<Event> {
        game.update(Duration::ZERO, commands)
    }

    #[test]
    fn selecting_play_starts_a_round() {
        let mut game = Game::new(3);
        let events = tick(&mut game, &[Command::Select]);
        assert_eq!(game.state(), GameState::Playing);
        assert!(game.session().piece.is_some());
        assert!(game.session().preview.is_some());
        assert!(!events.contains(&Event::Quit));
    }

    #[test]
    fn menu_navigation_reaches_every_entry() {
        let mut game = Game::new(3);
        tick(&mut game, &[Command::MenuDown]);
        tick(&mut game, &[Command::Select]);
        assert_eq!(game.state(), GameState::Highscores);
        tick(&mut game, &[Command::Back]);
        assert_eq!(game.state(), GameState::Menu);

        tick(&mut game, &[Command::MenuDown, Command::MenuDown]);
        let events = tick(&mut game, &[Command::Select]);
        assert!(events.contains(&Event::Quit));
        // Quit is only reported; the state machine stays put.
        assert_eq!(game.state(), GameState::Menu);
    }

    #[test]
    fn escape_in_menu_jumps_to_exit() {
        let mut game = Game::new(3);
        tick(&mut game, &[Command::Escape]);
        assert_eq!(game.session().menu_cursor, MenuItem::Exit);
    }

    #[test]
    fn pause_freezes_gravity_and_resume_continues() {
        let mut game = Game::new(3);
        tick(&mut game, &[Command::Select]);
        let y_before = game.session().piece.unwrap().y;

        tick(&mut game, &[Command::Pause]);
        assert_eq!(game.state(), GameState::Paused);
        // Plenty of elapsed time while paused moves nothing.
        game.update(Duration::from_secs(5), &[]);
        assert_eq!(game.session().piece.unwrap().y, y_before);

        tick(&mut game, &[Command::Resume]);
        assert_eq!(game.state(), GameState::Playing);

        tick(&mut game, &[Command::Pause]);
        tick(&mut game, &[Command::Escape]);
        assert_eq!(game.state(), GameState::Menu);
    }

    #[test]
    fn gameplay_commands_are_ignored_outside_playing() {
        let mut game = Game::new(3);
        tick(&mut game, &[Command::Select, Command::Pause]);
        let piece_before = game.session().piece;
        tick(
            &mut game,
            &[Command::MoveLeft, Command::HardDrop, Command::Rotate],
        );
        assert_eq!(game.session().piece, piece_before);
        assert_eq!(game.state(), GameState::Paused);
    }

    #[test]
    fn walls_stop_horizontal_movement() {
        let mut game = playing_game_with(PieceKind::O);
        for _ in 0..WELL_WIDTH {
            tick(&mut game, &[Command::MoveLeft]);
        }
        let x_at_wall = game.session().piece.unwrap().x;
        tick(&mut game, &[Command::MoveLeft]);
        assert_eq!(game.session().piece.unwrap().x, x_at_wall);
    }

    #[test]
    fn gravity_advances_only_at_the_interval() {
        let mut game = playing_game_with(PieceKind::T);
        let interval = game.session().gravity_interval;
        let y0 = game.session().piece.unwrap().y;

        game.update(interval / 2, &[]);
        assert_eq!(game.session().piece.unwrap().y, y0);

        // Accumulator reaches the threshold; the *next* tick steps.
        game.update(interval / 2, &[]);
        game.update(Duration::ZERO, &[]);
        assert_eq!(game.session().piece.unwrap().y, y0 + 1);
    }

    #[test]
    fn hard_dropped_i_piece_lands_flush_on_the_floor() {
        let mut game = playing_game_with(PieceKind::I);

        // The drop teleports to the last free row and forces the gravity
        // accumulator, so the gravity step of this same tick locks it.
        let events = tick(&mut game, &[Command::HardDrop]);
        assert!(events.contains(&Event::PieceLocked));

        let well = &game.session().well;
        let bottom_filled = (0..WELL_WIDTH as i32)
            .filter(|&x| well.tile(x, WELL_HEIGHT as i32 - 1) != Ok(Cell::Empty))
            .count();
        assert_eq!(bottom_filled, 4);
        // Nothing above the floor row.
        for y in 0..WELL_HEIGHT as i32 - 1 {
            for x in 0..WELL_WIDTH as i32 {
                assert_eq!(well.tile(x, y), Ok(Cell::Empty));
            }
        }
    }

    #[test]
    fn soft_drop_on_the_floor_locks_immediately() {
        let mut game = playing_game_with(PieceKind::O);
        {
            // Rest the O square on the floor (its cells sit one row below
            // its center).
            let session = game.session_mut_for_tests();
            let mut piece = session.piece.unwrap();
            piece.y = WELL_HEIGHT as i32 - 2;
            session.piece = Some(piece);
        }

        let events = tick(&mut game, &[Command::SoftDrop]);
        assert!(events.contains(&Event::PieceLocked));
        assert!(game.session().piece.is_some(), "next piece spawned");

        let well = &game.session().well;
        for (x, y) in [(5, 18), (6, 18), (5, 19), (6, 19)] {
            assert_eq!(well.tile(x, y), Ok(Cell::Filled(PieceKind::O)));
        }
    }

    #[test]
    fn rotation_is_rejected_when_every_kick_collides() {
        let mut game = playing_game_with(PieceKind::I);
        // Box the I piece in with a ceiling and a floor around its row.
        {
            let session = game.session_mut_for_tests();
            let y = session.piece.unwrap().y;
            for x in 0..WELL_WIDTH as i32 {
                session.well.set_tile(x, y - 1, Cell::Filled(PieceKind::J)).unwrap();
                session.well.set_tile(x, y + 1, Cell::Filled(PieceKind::J)).unwrap();
            }
        }
        let tiles_before = game.session().piece.unwrap().tiles;
        tick(&mut game, &[Command::Rotate]);
        assert_eq!(game.session().piece.unwrap().tiles, tiles_before);
    }

    #[test]
    fn rotation_near_the_wall_kicks_one_column_right() {
        let mut game = playing_game_with(PieceKind::I);
        // Vertical I one column off the left wall: the horizontal bar
        // would stick out at column -1 in place, but fits kicked right.
        tick(&mut game, &[Command::Rotate]);
        for _ in 0..4 {
            tick(&mut game, &[Command::MoveLeft]);
        }
        let vertical = game.session().piece.unwrap();
        assert_eq!(vertical.x, 1);

        tick(&mut game, &[Command::Rotate]);
        let piece = game.session().piece.unwrap();
        assert_ne!(piece.tiles, vertical.tiles);
        assert_eq!(piece.x, 2);
    }

    #[test]
    fn completed_row_waits_for_the_clear_delay() {
        let mut game = playing_game_with(PieceKind::I);
        {
            let session = game.session_mut_for_tests();
            // Bottom row full except where the horizontal I will land
            // (columns 4..=7 at x = 5).
            for x in [0, 1, 2, 3, 8, 9] {
                session
                    .well
                    .set_tile(x, WELL_HEIGHT as i32 - 1, Cell::Filled(PieceKind::L))
                    .unwrap();
            }
        }
        let events = tick(&mut game, &[Command::HardDrop]);
        assert!(events.contains(&Event::PieceLocked));
        assert!(events.contains(&Event::LinesCleared(1)));
        assert!(events.contains(&Event::ScoreChanged(40)));

        // The completed row is marked, no piece falls, commands are dead.
        let bottom = WELL_HEIGHT as i32 - 1;
        assert_eq!(game.session().well.tile(0, bottom), Ok(Cell::Marked));
        assert!(game.session().piece.is_none());
        tick(&mut game, &[Command::MoveLeft, Command::Pause]);
        assert_eq!(game.state(), GameState::Playing);

        // Once the delay elapses the row collapses and the next piece spawns.
        game.update(LINE_CLEAR_DELAY, &[]);
        assert_eq!(game.session().well.tile(0, bottom), Ok(Cell::Empty));
        assert!(game.session().pending_clear.is_empty());
        assert!(game.session().piece.is_some());
        assert_eq!(game.session().score.points, 40);
        assert_eq!(game.session().score.lines, 1);
    }

    #[test]
    fn blocked_spawn_ends_the_round() {
        let mut game = Game::new(3);
        tick(&mut game, &[Command::Select]);
        {
            let session = game.session_mut_for_tests();
            // Wall off the spawn rows, leaving column 0 open so none of
            // these rows counts as a completed line.
            for y in 0..4 {
                for x in 1..WELL_WIDTH as i32 {
                    session
                        .well
                        .set_tile(x, y, Cell::Filled(PieceKind::Z))
                        .unwrap();
                }
            }
            // Park the falling piece straight above the floor pile.
            let mut piece = Piece::new(PieceKind::O);
            piece.x = WELL_WIDTH as i32 / 2;
            piece.y = WELL_HEIGHT as i32 - 3;
            session.piece = Some(piece);
        }
        let events = tick(&mut game, &[Command::HardDrop]);
        assert!(events.contains(&Event::GameOver));
        assert_eq!(game.state(), GameState::GameOver);

        tick(&mut game, &[Command::Select]);
        assert_eq!(game.state(), GameState::Menu);
    }

    impl Game {
        fn session_mut_for_tests(&mut self) -> &mut Session {
            &mut self.session
        }
    }
}
