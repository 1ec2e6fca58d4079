//! Auto-repeat for held movement keys.
//!
//! On terminals with the kitty keyboard protocol we receive real press and
//! release events, so repeats are synthesized here: a fixed-size table of
//! per-command hold states, delayed-auto-shift first, then a steady repeat
//! rate. On plain terminals the OS key repeat delivers `Repeat` key events
//! instead and this table stays empty.

use std::time::{Duration, Instant};

use quadfall_engine::Command;

/// How long a movement key must be held before it starts auto-repeating.
pub const DELAYED_AUTO_SHIFT: Duration = Duration::from_millis(167);
/// Time between auto-repeats once they have started.
pub const AUTO_REPEAT_RATE: Duration = Duration::from_millis(33);

/// Whether holding the key should keep re-issuing the command.
pub fn auto_repeats(command: Command) -> bool {
    matches!(
        command,
        Command::MoveLeft | Command::MoveRight | Command::SoftDrop
    )
}

#[derive(Clone, Copy, Debug)]
struct HoldState {
    pressed_at: Instant,
    last_repeat: Option<Instant>,
}

/// Per-command hold states, indexed by the command's discriminant.
#[derive(Default, Debug)]
pub struct RepeatTable {
    held: [Option<HoldState>; Command::VARIANTS.len()],
}

impl RepeatTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a fresh key-down. Non-repeating commands are not tracked.
    pub fn press(&mut self, command: Command, now: Instant) {
        if auto_repeats(command) {
            self.held[command] = Some(HoldState {
                pressed_at: now,
                last_repeat: None,
            });
        }
    }

    pub fn release(&mut self, command: Command) {
        self.held[command] = None;
    }

    pub fn release_all(&mut self) {
        self.held = Default::default();
    }

    /// Commands whose repeat is due at `now`, in declaration order.
    pub fn poll(&mut self, now: Instant) -> Vec<Command> {
        let mut due = Vec::new();
        for command in Command::VARIANTS {
            let Some(hold) = &mut self.held[command] else {
                continue;
            };
            if now.saturating_duration_since(hold.pressed_at) < DELAYED_AUTO_SHIFT {
                continue;
            }
            let ready = match hold.last_repeat {
                None => true,
                Some(last) => now.saturating_duration_since(last) >= AUTO_REPEAT_RATE,
            };
            if ready {
                hold.last_repeat = Some(now);
                due.push(command);
            }
        }
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeats_start_after_the_shift_delay() {
        let t0 = Instant::now();
        let mut table = RepeatTable::new();
        table.press(Command::MoveLeft, t0);

        assert!(table.poll(t0).is_empty());
        assert!(table.poll(t0 + DELAYED_AUTO_SHIFT / 2).is_empty());
        assert_eq!(
            table.poll(t0 + DELAYED_AUTO_SHIFT),
            vec![Command::MoveLeft]
        );
    }

    #[test]
    fn repeats_tick_at_the_repeat_rate() {
        let t0 = Instant::now();
        let mut table = RepeatTable::new();
        table.press(Command::SoftDrop, t0);

        let t1 = t0 + DELAYED_AUTO_SHIFT;
        assert_eq!(table.poll(t1), vec![Command::SoftDrop]);
        // Immediately afterwards nothing is due yet.
        assert!(table.poll(t1).is_empty());
        assert_eq!(
            table.poll(t1 + AUTO_REPEAT_RATE),
            vec![Command::SoftDrop]
        );
    }

    #[test]
    fn release_stops_the_repeats() {
        let t0 = Instant::now();
        let mut table = RepeatTable::new();
        table.press(Command::MoveRight, t0);
        table.release(Command::MoveRight);
        assert!(table.poll(t0 + DELAYED_AUTO_SHIFT * 2).is_empty());
    }

    #[test]
    fn non_movement_commands_never_repeat() {
        let t0 = Instant::now();
        let mut table = RepeatTable::new();
        table.press(Command::HardDrop, t0);
        table.press(Command::Rotate, t0);
        assert!(table.poll(t0 + DELAYED_AUTO_SHIFT * 2).is_empty());
    }

    #[test]
    fn held_keys_repeat_independently() {
        let t0 = Instant::now();
        let mut table = RepeatTable::new();
        table.press(Command::MoveLeft, t0);
        table.press(Command::SoftDrop, t0 + AUTO_REPEAT_RATE);

        let due = table.poll(t0 + DELAYED_AUTO_SHIFT + AUTO_REPEAT_RATE);
        assert_eq!(due, vec![Command::MoveLeft, Command::SoftDrop]);

        table.release_all();
        assert!(table.poll(t0 + DELAYED_AUTO_SHIFT * 4).is_empty());
    }
}
