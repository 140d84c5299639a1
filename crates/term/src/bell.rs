//! Terminal bell as an audio sink.
//!
//! A terminal has no music and one sound. Wrong answers and round ends ring
//! the bell; music is only tracked so the log shows when it would play.

use std::io::{self, Write};

use tracing::{debug, warn};

use crate::engine::AudioSink;
use crate::types::AudioCue;

const BEL: &[u8] = b"\x07";

pub struct BellAudio<W: Write = io::Stdout> {
    out: W,
    music_volume: Option<f32>,
    rings: u32,
}

impl BellAudio<io::Stdout> {
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl Default for BellAudio<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> BellAudio<W> {
    pub fn with_writer(out: W) -> Self {
        Self {
            out,
            music_volume: None,
            rings: 0,
        }
    }

    /// Bells rung so far.
    pub fn rings(&self) -> u32 {
        self.rings
    }

    pub fn music_volume(&self) -> Option<f32> {
        self.music_volume
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn ring(&mut self, times: u32) {
        for _ in 0..times {
            if let Err(e) = self.out.write_all(BEL) {
                warn!(error = %e, "bell write failed");
                return;
            }
            self.rings += 1;
        }
        let _ = self.out.flush();
    }
}

fn bells_for(cue: AudioCue) -> u32 {
    match cue {
        AudioCue::Correct | AudioCue::RoundStart => 0,
        AudioCue::Wrong | AudioCue::RoundOver => 1,
        AudioCue::PerfectScore => 2,
    }
}

impl<W: Write> AudioSink for BellAudio<W> {
    fn play(&mut self, cue: AudioCue) {
        self.ring(bells_for(cue));
    }

    fn start_music(&mut self, volume: f32) {
        debug!(volume, "music on");
        self.music_volume = Some(volume);
    }

    fn stop_music(&mut self) {
        debug!("music off");
        self.music_volume = None;
    }

    fn set_music_volume(&mut self, volume: f32) {
        if self.music_volume.is_some() {
            self.music_volume = Some(volume);
        }
    }
}
