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
    style::{Color, Print, PrintStyledContent, Stylize},
    terminal::{Clear, ClearType},
    QueueableCommand,
};

use quadfall_engine::{Command, GameState, MenuItem};

use crate::application::{Application, ScreenUpdate};

fn item_label(item: MenuItem) -> &'static str {
    match item {
        MenuItem::Play => "Play",
        MenuItem::Highscores => "Highscores",
        MenuItem::Exit => "Exit",
    }
}

impl<T: Write> Application<T> {
    pub(in crate::application) fn run_screen_title(&mut self) -> io::Result<ScreenUpdate> {
        loop {
            let w_main: usize = Self::W_MAIN.into();
            let (x_main, y_main) = Self::fetch_main_xy();
            let y_selection = Self::H_MAIN / 5;

            let title = [
                r"  ___  _   _  ___  ___  ___  ___  _    _    ",
                r" / _ \| | | |/ _ \|   \| __|/ _ \| |  | |   ",
                r"| (_) | |_| | |_| | |) | _|| |_| | |__| |__ ",
                r" \__\_\\___/|_| |_|___/|_| |_| |_|____|____|",
            ];
            let title_colors = [Color::Cyan, Color::Yellow, Color::Magenta, Color::Red];

            self.term.queue(Clear(ClearType::All))?;

            let dx_title = w_main.saturating_sub(title[0].len()) / 2;
            for (dy, (line, color)) in title.iter().zip(title_colors).enumerate() {
                self.term
                    .queue(MoveTo(
                        x_main + u16::try_from(dx_title).unwrap(),
                        y_main + y_selection + u16::try_from(dy).unwrap(),
                    ))?
                    .queue(PrintStyledContent(line.with(color)))?;
            }

            let selected = self.game.session().menu_cursor;
            for (i, item) in MenuItem::VARIANTS.into_iter().enumerate() {
                let name = item_label(item);
                self.term
                    .queue(MoveTo(
                        x_main,
                        y_main + y_selection + 6 + u16::try_from(i).unwrap(),
                    ))?
                    .queue(Print(format!(
                        "{:^w_main$}",
                        if item == selected {
                            format!(">> {name} <<")
                        } else {
                            name.to_owned()
                        }
                    )))?;
            }
            self.term
                .queue(MoveTo(
                    x_main,
                    y_main + y_selection + 6 + u16::try_from(MenuItem::VARIANTS.len()).unwrap() + 2,
                ))?
                .queue(PrintStyledContent(
                    format!(
                        "{:^w_main$}",
                        "(Controls: [↓|↑] select [Enter] confirm / jke)",
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
                // Move selector up.
                Event::Key(KeyEvent {
                    code: KeyCode::Up | KeyCode::Char('k' | 'K'),
                    kind: Press | Repeat,
                    ..
                }) => Some(Command::MenuUp),
                // Move selector down.
                Event::Key(KeyEvent {
                    code: KeyCode::Down | KeyCode::Char('j' | 'J'),
                    kind: Press | Repeat,
                    ..
                }) => Some(Command::MenuDown),
                // Confirm the selected entry.
                Event::Key(KeyEvent {
                    code: KeyCode::Enter | KeyCode::Char('e' | 'E'),
                    kind: Press,
                    ..
                }) => Some(Command::Select),
                // Jump the selector to "Exit".
                Event::Key(KeyEvent {
                    code:
                        KeyCode::Esc
                        | KeyCode::Char('q' | 'Q')
                        | KeyCode::Backspace
                        | KeyCode::Char('b' | 'B'),
                    kind: Press,
                    ..
                }) => Some(Command::Back),
                // Other event: don't care.
                _ => None,
            };

            if let Some(command) = command {
                let events = self.game.update(Duration::ZERO, &[command]);
                if let Some(update) = self.note_events(&events) {
                    break Ok(update);
                }
                if self.game.state() != GameState::Menu {
                    break Ok(ScreenUpdate::Continue);
                }
            }
        }
    }
}
