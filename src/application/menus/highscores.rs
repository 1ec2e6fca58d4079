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
    pub(in crate::application) fn run_screen_highscores(&mut self) -> io::Result<ScreenUpdate> {
        loop {
            let w_main: usize = Self::W_MAIN.into();
            let (x_main, y_main) = Self::fetch_main_xy();
            let y_selection = Self::H_MAIN / 5;

            self.term
                .queue(Clear(ClearType::All))?
                .queue(MoveTo(x_main, y_main + y_selection))?
                .queue(Print(format!("{:^w_main$}", "* Highscores *")))?
                .queue(MoveTo(x_main, y_main + y_selection + 2))?
                .queue(Print(format!("{:^w_main$}", "──────────────────────────")))?;

            if self.scoreboard.entries().is_empty() {
                self.term
                    .queue(MoveTo(x_main, y_main + y_selection + 4))?
                    .queue(Print(format!("{:^w_main$}", "(no highscores yet)")))?;
            }
            for (i, entry) in self.scoreboard.entries().iter().enumerate() {
                let line = format!(
                    "{}. {:>6} pts   level {:<2}  {:>3} lines   {}",
                    i + 1,
                    entry.score.points,
                    entry.score.level,
                    entry.score.lines,
                    entry.datetime,
                );
                self.term
                    .queue(MoveTo(
                        x_main,
                        y_main + y_selection + 4 + u16::try_from(i).unwrap(),
                    ))?
                    .queue(Print(format!("{line:^w_main$}")))?;
            }

            self.term
                .queue(MoveTo(x_main, y_main + y_selection + 9))?
                .queue(PrintStyledContent(
                    format!("{:^w_main$}", "(Controls: [Esc|Enter] back)").italic(),
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
                // Back to the title menu.
                Event::Key(KeyEvent {
                    code:
                        KeyCode::Esc
                        | KeyCode::Enter
                        | KeyCode::Char('q' | 'Q' | 'e' | 'E')
                        | KeyCode::Backspace
                        | KeyCode::Char('b' | 'B'),
                    kind: Press,
                    ..
                }) => Some(Command::Back),
                // Other event: don't care.
                _ => None,
            };

            if let Some(command) = command {
                self.game.update(Duration::ZERO, &[command]);
                if self.game.state() != GameState::Highscores {
                    break Ok(ScreenUpdate::Continue);
                }
            }
        }
    }
}
