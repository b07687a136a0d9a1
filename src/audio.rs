//! Sound cues
//!
//! The simulation only names sounds; the host owns the actual playback and
//! plugs it in through `AudioSink`.

use serde::{Deserialize, Serialize};

use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Ship fired
    Shot,
    /// Enemy fired
    EnemyShot,
    /// Meteorite, enemy or ship blew up
    Explosion,
    /// Ship lost health
    Hit,
    /// Shield charge absorbed a hit
    ShieldBlock,
    /// Gadget collected
    Pickup,
    /// Dash started
    Dash,
    /// Level cleared / round or match won
    Win,
    /// Game over
    GameOver,
}

/// Host-side playback
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect);
}

/// Play every sound cue in `events`; returns how many were played.
/// Nothing plays when sound is disabled or no sink is attached.
pub fn play_cues(events: &[GameEvent], settings: &Settings, sink: Option<&mut dyn AudioSink>) -> usize {
    let Some(sink) = sink else {
        return 0;
    };
    if !settings.sound_enabled {
        return 0;
    }

    let mut played = 0;
    for event in events {
        if let GameEvent::Sound(effect) = event {
            sink.play(*effect);
            played += 1;
        }
    }
    played
}
