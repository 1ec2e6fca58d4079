use std::{
    io::{self, Write},
    time::Duration,
};

use crossterm::{
    cursor::MoveTo,
    event::{
        self, Event, KeyCode, KeyEvent,
        KeyEventKind::{Press, Repeat},
        KeyModifiers,
    },
    style::{Print, PrintStyledContent, Stylize},
    terminal::{Clear, ClearType},
    QueueableCommand,
};

use quadfall_engine::{Command, GameState};

use crate::application::{Application, ScreenUpdate};

impl<T: Write> Application<T> {
    pub(in crate::application) fn run_screen_game_over(&mut self) -> io::Result<ScreenUpdate> {
        let score = self.game.session().score;
        let best = self
            .scoreboard
            .entries()
            .first()
            .is_some_and(|e| e.score == score);

        loop {
            let w_main: usize = Self::W_MAIN.into();
            let (x_main, y_main) = Self::fetch_main_xy();
            let y_selection = Self::H_MAIN / 5;

            self.term
                .queue(Clear(ClearType::All))?
                .queue(MoveTo(x_main, y_main + y_selection))?
                .queue(Print(format!("{:^w_main$}", "-- Game Over --")))?
                .queue(MoveTo(x_main, y_main + y_selection + 2))?
                .queue(Print(format!("{:^w_main$}", "──────────────────────────")))?;

            let stats = [
                format!("Score: {}", score.points),
                format!("Level: {}", score.level),
                format!("Lines: {}", score.lines),
            ];
            for (i, s) in stats.iter().enumerate() {
                self.term
                    .queue(MoveTo(
                        x_main,
                        y_main + y_selection + 3 + u16::try_from(i).unwrap(),
                    ))?
                    .queue(Print(format!("{s:^w_main$}")))?;
            }
            if best {
                self.term
                    .queue(MoveTo(
                        x_main,
                        y_main + y_selection + 3 + u16::try_from(stats.len()).unwrap() + 1,
                    ))?
                    .queue(Print(format!("{:^w_main$}", "++ New best score! ++")))?;
            }

            self.term
                .queue(MoveTo(x_main, y_main + y_selection + 9))?
                .queue(PrintStyledContent(
                    format!("{:^w_main$}", "(Controls: [Esc|Enter] back to menu)").italic(),
                ))?;
            self.term.flush()?;

            // Wait for new input.
            let command = match event::read()? {
                // Quit application.
                Event::Key(KeyEvent {
                    code: KeyCode::Char('c' | 'C'),
                    modifiers: KeyModifiers::CONTROL,
                    kind: Press | Repeat,
                    state: _,
                }) => break Ok(ScreenUpdate::Quit),
                // Acknowledge and return to the title menu.
                Event::Key(KeyEvent {
                    code:
                        KeyCode::Esc
                        | KeyCode::Enter
                        | KeyCode::Char('q' | 'Q' | 'e' | 'E')
                        | KeyCode::Backspace,
                    kind: Press,
                    ..
                }) => Some(Command::Select),
                // Other event: don't care.
                _ => None,
            };

            if let Some(command) = command {
                self.game.update(Duration::ZERO, &[command]);
                if self.game.state() != GameState::GameOver {
                    break Ok(ScreenUpdate::Continue);
                }
            }
        }
    }
}
