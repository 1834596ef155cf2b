use crate::app::Intent;

// Control characters a raw terminal delivers for ctrl+s / ctrl+t
const KEY_CTRL_S: char = '\u{0013}';
const KEY_CTRL_T: char = '\u{0014}';

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Shortcut {
    AddStopwatch,
    AddTimer,
}

impl Shortcut {
    /// Recognise "ctrl+s", "C-s", "^S" and the raw control characters.
    pub fn from_chord(chord: &str) -> Option<Self> {
        let chord = chord.trim();
        let mut chars = chord.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return match c {
                KEY_CTRL_S => Some(Shortcut::AddStopwatch),
                KEY_CTRL_T => Some(Shortcut::AddTimer),
                _ => None,
            };
        }

        let lower = chord.to_ascii_lowercase();
        let key = ["ctrl+", "ctrl-", "c-", "^"]
            .iter()
            .find_map(|prefix| lower.strip_prefix(prefix))?;
        match key {
            "s" => Some(Shortcut::AddStopwatch),
            "t" => Some(Shortcut::AddTimer),
            _ => None,
        }
    }

    /// Same add operation the explicit commands use; the label defaults.
    pub fn intent(self) -> Intent {
        match self {
            Shortcut::AddStopwatch => Intent::AddStopwatch { label: None },
            Shortcut::AddTimer => Intent::AddTimer { label: None },
        }
    }
}
