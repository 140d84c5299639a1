//! Audio preferences and the controller that applies them.
//!
//! Preferences are passed in at construction and written back through a
//! [`KeyValueStore`] whenever they change.

use anyhow::Result;
use tracing::{debug, warn};

use crate::ports::{AudioSink, KeyValueStore};
use crate::types::{AudioCue, DEFAULT_MUSIC_VOLUME, MUSIC_VOLUME_STEP};

pub const SOUND_MUTED_KEY: &str = "soundMuted";
pub const MUSIC_MUTED_KEY: &str = "musicMuted";
pub const MUSIC_VOLUME_KEY: &str = "musicVolume";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AudioPreferences {
    pub sound_muted: bool,
    pub music_muted: bool,
    /// 0.0..=1.0
    pub music_volume: f32,
}

impl Default for AudioPreferences {
    fn default() -> Self {
        Self {
            sound_muted: false,
            music_muted: false,
            music_volume: DEFAULT_MUSIC_VOLUME,
        }
    }
}

impl AudioPreferences {
    /// Read preferences, falling back to defaults for missing or garbled keys.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let defaults = Self::default();
        let flag = |key: &str, default: bool| match store.get(key).as_deref() {
            Some("true") => true,
            Some("false") => false,
            _ => default,
        };
        let music_volume = store
            .get(MUSIC_VOLUME_KEY)
            .and_then(|v| v.trim().parse::<f32>().ok())
            .filter(|v| v.is_finite())
            .map(clamp_volume)
            .unwrap_or(defaults.music_volume);

        Self {
            sound_muted: flag(SOUND_MUTED_KEY, defaults.sound_muted),
            music_muted: flag(MUSIC_MUTED_KEY, defaults.music_muted),
            music_volume,
        }
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<()> {
        store.set(SOUND_MUTED_KEY, bool_str(self.sound_muted))?;
        store.set(MUSIC_MUTED_KEY, bool_str(self.music_muted))?;
        store.set(MUSIC_VOLUME_KEY, &format!("{:.2}", self.music_volume))?;
        Ok(())
    }
}

fn bool_str(v: bool) -> &'static str {
    if v {
        "true"
    } else {
        "false"
    }
}

/// Clamp to 0..=1 and round to two decimals so repeated steps don't drift.
fn clamp_volume(v: f32) -> f32 {
    (v.clamp(0.0, 1.0) * 100.0).round() / 100.0
}

/// Gates cues and music through the player's preferences.
pub struct AudioController {
    sink: Box<dyn AudioSink>,
    store: Box<dyn KeyValueStore>,
    prefs: AudioPreferences,
    music_playing: bool,
}

impl AudioController {
    /// Build a controller, loading preferences from `store`.
    pub fn new(sink: Box<dyn AudioSink>, store: Box<dyn KeyValueStore>) -> Self {
        let prefs = AudioPreferences::load(store.as_ref());
        Self::with_preferences(sink, store, prefs)
    }

    pub fn with_preferences(
        sink: Box<dyn AudioSink>,
        store: Box<dyn KeyValueStore>,
        prefs: AudioPreferences,
    ) -> Self {
        Self {
            sink,
            store,
            prefs,
            music_playing: false,
        }
    }

    pub fn preferences(&self) -> AudioPreferences {
        self.prefs
    }

    pub fn is_music_playing(&self) -> bool {
        self.music_playing
    }

    pub fn cue(&mut self, cue: AudioCue) {
        if self.prefs.sound_muted {
            return;
        }
        debug!(cue = cue.as_str(), "audio cue");
        self.sink.play(cue);
    }

    pub fn start_music(&mut self) {
        if self.prefs.music_muted || self.music_playing {
            return;
        }
        self.sink.start_music(self.prefs.music_volume);
        self.music_playing = true;
    }

    pub fn stop_music(&mut self) {
        if !self.music_playing {
            return;
        }
        self.sink.stop_music();
        self.music_playing = false;
    }

    /// Flip the sound-effects mute. Returns the new muted state.
    pub fn toggle_sound(&mut self) -> bool {
        self.prefs.sound_muted = !self.prefs.sound_muted;
        self.persist();
        self.prefs.sound_muted
    }

    /// Flip the music mute. Muting stops music at once; unmuting resumes it
    /// only when `round_live` is set, since music belongs to a round.
    pub fn toggle_music(&mut self, round_live: bool) -> bool {
        self.prefs.music_muted = !self.prefs.music_muted;
        self.persist();
        if self.prefs.music_muted {
            self.stop_music();
        } else if round_live {
            self.start_music();
        }
        self.prefs.music_muted
    }

    pub fn set_music_volume(&mut self, volume: f32) -> f32 {
        self.prefs.music_volume = clamp_volume(volume);
        if self.music_playing {
            self.sink.set_music_volume(self.prefs.music_volume);
        }
        self.persist();
        self.prefs.music_volume
    }

    /// Step volume up (`steps > 0`) or down by `MUSIC_VOLUME_STEP` per step.
    pub fn adjust_music_volume(&mut self, steps: i32) -> f32 {
        self.set_music_volume(self.prefs.music_volume + steps as f32 * MUSIC_VOLUME_STEP)
    }

    fn persist(&mut self) {
        if let Err(e) = self.prefs.save(self.store.as_mut()) {
            warn!(error = %e, "failed to persist audio preferences");
        }
    }
}
