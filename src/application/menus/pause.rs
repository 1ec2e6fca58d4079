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
    pub(in crate::application) fn run_screen_pause(&mut self) -> io::Result<ScreenUpdate> {
        loop {
            let w_main: usize = Self::W_MAIN.into();
            let (x_main, y_main) = Self::fetch_main_xy();
            let y_selection = Self::H_MAIN / 5;

            let score = self.game.session().score;
            self.term
                .queue(Clear(ClearType::All))?
                .queue(MoveTo(x_main, y_main + y_selection))?
                .queue(Print(format!("{:^w_main$}", "* Game Paused *")))?
                .queue(MoveTo(x_main, y_main + y_selection + 2))?
                .queue(Print(format!(
                    "{:^w_main$}",
                    format!(
                        "score {}  |  level {}  |  lines {}",
                        score.points, score.level, score.lines
                    )
                )))?
                .queue(MoveTo(x_main, y_main + y_selection + 5))?
                .queue(PrintStyledContent(
                    format!(
                        "{:^w_main$}",
                        "(Controls: [Enter] resume [Esc] back to menu)",
                    )
                    .italic(),
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
                // Continue the round.
                Event::Key(KeyEvent {
                    code: KeyCode::Enter | KeyCode::Char('e' | 'E'),
                    kind: Press,
                    ..
                }) => Some(Command::Resume),
                // Abandon the round and return to the title menu.
                Event::Key(KeyEvent {
                    code: KeyCode::Esc | KeyCode::Char('q' | 'Q'),
                    kind: Press,
                    ..
                }) => Some(Command::Escape),
                // Other event: don't care.
                _ => None,
            };

            if let Some(command) = command {
                self.game.update(Duration::ZERO, &[command]);
                if self.game.state() != GameState::Paused {
                    break Ok(ScreenUpdate::Continue);
                }
            }
        }
    }
}
