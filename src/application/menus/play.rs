use std::{
    io::{self, Write},
    time::{Duration, Instant},
};

use crossterm::{
    event::{self, Event as TermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    ExecutableCommand,
};

use quadfall_engine::{Command, GameState};

use crate::{
    application::{Application, ScreenUpdate},
    input::RepeatTable,
    keybinds::normalize,
};

/// How many times per second the game is updated and redrawn.
const GAME_FPS: f64 = 30.0;

impl<T: Write> Application<T> {
    pub(in crate::application) fn run_screen_play(&mut self) -> io::Result<ScreenUpdate> {
        /* The game loop recipe looks like this:
          * Enter 'update_and_render loop:
            - If the engine left the Playing state, break the loop.
            - Enter 'wait loop (budget based on the next frame time):
              + Translate terminal key events into engine commands.
              + If the budget ran out, break the loop.
            - Do game.update() with the elapsed time and queued commands.
            - Render the current state.
            - Continue 'update_and_render.
        */

        // Toggle on enhanced keyboard events where available, so we see
        // key releases and can do our own auto-shift.
        if self.kitty_enabled {
            let _v = self
                .term
                .execute(event::PushKeyboardEnhancementFlags(
                    Self::KEYBOARD_ENHANCEMENT_FLAGS,
                ));
        }

        let frame_interval = Duration::from_secs_f64(GAME_FPS.recip());

        let mut repeat_table = RepeatTable::new();
        let mut commands: Vec<Command> = Vec::new();
        let mut last_update = Instant::now();
        let mut time_next_frame = Instant::now();

        // Initial render.
        self.render_game()?;

        let screen_update = 'update_and_render: loop {
            if self.game.state() != GameState::Playing {
                // Paused or ended; the run loop opens the matching screen.
                break 'update_and_render ScreenUpdate::Continue;
            }

            // Calculate the time of the next frame we can catch.
            // We just skip a frame if we missed its window anyway.
            let now = Instant::now();
            loop {
                time_next_frame += frame_interval;
                if time_next_frame >= now {
                    break;
                }
            }

            'wait: loop {
                // Compute duration left until we should stop waiting.
                let budget = time_next_frame.saturating_duration_since(Instant::now());

                // Frame budget expired on its own: leave the wait loop.
                if !event::poll(budget)? {
                    break 'wait;
                }

                match event::read()? {
                    TermEvent::Key(KeyEvent {
                        code,
                        modifiers,
                        kind,
                        state: _,
                    }) => {
                        // [Ctrl+C]: Abort program.
                        if matches!(code, KeyCode::Char('c' | 'C'))
                            && modifiers == KeyModifiers::CONTROL
                            && matches!(kind, KeyEventKind::Press | KeyEventKind::Repeat)
                        {
                            break 'update_and_render ScreenUpdate::Quit;
                        }

                        // [Esc]: Pause.
                        if code == KeyCode::Esc && kind == KeyEventKind::Press {
                            commands.push(Command::Pause);
                            continue 'wait;
                        }

                        let Some(&command) = self.keybinds.get(&normalize((code, modifiers)))
                        else {
                            continue 'wait;
                        };
                        match kind {
                            KeyEventKind::Press => {
                                commands.push(command);
                                repeat_table.press(command, Instant::now());
                            }
                            // Without the kitty protocol the terminal's own
                            // key repeat stands in for delayed auto-shift.
                            KeyEventKind::Repeat => {
                                if !self.kitty_enabled {
                                    commands.push(command);
                                }
                            }
                            KeyEventKind::Release => repeat_table.release(command),
                        }
                    }

                    // Redraw happens every frame; nothing extra to do.
                    TermEvent::Resize(_, _) => break 'wait,

                    // Key releases may never arrive once focus is gone.
                    TermEvent::FocusLost => repeat_table.release_all(),

                    // Other event: don't care.
                    _ => {}
                }
            }

            // Auto-shift for keys held since earlier frames.
            if self.kitty_enabled {
                commands.extend(repeat_table.poll(Instant::now()));
            }

            let now = Instant::now();
            let elapsed = now.saturating_duration_since(last_update);
            last_update = now;

            let events = self.game.update(elapsed, &commands);
            commands.clear();
            if let Some(update) = self.note_events(&events) {
                break 'update_and_render update;
            }

            // Render current state of the game.
            self.render_game()?;
        };

        if self.kitty_enabled {
            let _v = self.term.execute(event::PopKeyboardEnhancementFlags);
        }

        Ok(screen_update)
    }
}
