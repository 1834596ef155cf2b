use std::io::{self, Write};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SoundEvent {
    Started,
    Stopped,
    Lapped,
}

pub trait SoundPlayer {
    fn play(&self, event: SoundEvent) -> io::Result<()>;
}

/// Rings the terminal bell: once to start, twice to stop, once for a lap.
pub struct TerminalBell;

impl SoundPlayer for TerminalBell {
    fn play(&self, event: SoundEvent) -> io::Result<()> {
        let rings: &[u8] = match event {
            SoundEvent::Started | SoundEvent::Lapped => b"\x07",
            SoundEvent::Stopped => b"\x07\x07",
        };
        let mut err = io::stderr().lock();
        err.write_all(rings)?;
        err.flush()
    }
}

pub struct Silent;

impl SoundPlayer for Silent {
    fn play(&self, _event: SoundEvent) -> io::Result<()> {
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct AlertConfig {
    pub audio: bool,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self { audio: true }
    }
}

pub fn player_for(config: &AlertConfig) -> Box<dyn SoundPlayer> {
    if config.audio {
        Box::new(TerminalBell)
    } else {
        Box::new(Silent)
    }
}

/// Fire and forget. A failed playback is logged and otherwise ignored.
pub fn fire_sound(player: &dyn SoundPlayer, event: SoundEvent) {
    if let Err(e) = player.play(event) {
        log::warn!("Sound not played ({:?}): {}", event, e);
    }
}
