//! Audio port and volume mixer
//!
//! The simulation fires sounds at an [`AudioPort`] and never waits on it.
//! Playback failures are logged and swallowed: missing audio must not stop
//! the game.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::settings::Settings;

/// One-shot sound effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundId {
    /// Ball hits a paddle
    PaddleHit,
    /// Menu navigation, pause and resume
    ButtonClick,
    /// A player reached the winning score
    GameOver,
    /// Leaving the menu for the countdown
    BallBounceTransition,
}

impl SoundId {
    /// Clip file a sample-based backend loads for this effect
    pub fn clip_name(self) -> &'static str {
        match self {
            SoundId::PaddleHit | SoundId::ButtonClick => "ball_hit.wav",
            SoundId::GameOver => "game_over.wav",
            SoundId::BallBounceTransition => "ball_bounce.wav",
        }
    }
}

/// Looping background tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MusicTrack {
    Menu,
    Game,
}

impl MusicTrack {
    pub fn clip_name(self) -> &'static str {
        match self {
            MusicTrack::Menu => "menu_music.wav",
            MusicTrack::Game => "game_music.wav",
        }
    }
}

/// Fire-and-forget sound output used by the game loop
pub trait AudioPort {
    fn play(&mut self, sound: SoundId);
    /// Start looping `track`, replacing whatever was playing
    fn play_music(&mut self, track: MusicTrack);
    fn stop_music(&mut self);
}

/// Failure reported by a [`SoundBackend`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioError {
    DeviceUnavailable,
    MissingClip(&'static str),
    Backend(String),
}

impl fmt::Display for AudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioError::DeviceUnavailable => f.write_str("audio device unavailable"),
            AudioError::MissingClip(name) => write!(f, "clip not loaded: {}", name),
            AudioError::Backend(msg) => write!(f, "audio backend error: {}", msg),
        }
    }
}

impl std::error::Error for AudioError {}

/// Device-facing playback primitives wrapped by [`Mixer`]
pub trait SoundBackend {
    fn play_clip(&mut self, sound: SoundId, volume: f32) -> Result<(), AudioError>;
    fn start_loop(&mut self, track: MusicTrack, volume: f32) -> Result<(), AudioError>;
    fn stop_loop(&mut self) -> Result<(), AudioError>;
}

/// Applies volume and mute settings on top of a backend
pub struct Mixer<B> {
    backend: Option<B>,
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
    current_track: Option<MusicTrack>,
}

impl<B: SoundBackend> Mixer<B> {
    /// `None` means no device could be opened; every call becomes a no-op
    pub fn new(backend: Option<B>) -> Self {
        if backend.is_none() {
            log::warn!("No audio backend - audio disabled");
        }
        Self {
            backend,
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            muted: false,
            current_track: None,
        }
    }

    pub fn with_settings(backend: Option<B>, settings: &Settings) -> Self {
        let mut mixer = Self::new(backend);
        mixer.set_master_volume(settings.master_volume);
        mixer.set_sfx_volume(settings.sfx_volume);
        mixer.set_music_volume(settings.music_volume);
        mixer.set_muted(settings.muted);
        mixer
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Set music volume (0.0 - 1.0)
    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Track currently looping, if any
    pub fn current_track(&self) -> Option<MusicTrack> {
        self.current_track
    }

    pub fn backend(&self) -> Option<&B> {
        self.backend.as_ref()
    }

    fn effective_volume(&self, channel: f32) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * channel
        }
    }
}

impl<B: SoundBackend> AudioPort for Mixer<B> {
    fn play(&mut self, sound: SoundId) {
        let vol = self.effective_volume(self.sfx_volume);
        if vol <= 0.0 {
            return;
        }
        let Some(backend) = self.backend.as_mut() else {
            return;
        };
        if let Err(e) = backend.play_clip(sound, vol) {
            log::warn!("Failed to play {:?}: {}", sound, e);
        }
    }

    fn play_music(&mut self, track: MusicTrack) {
        if self.current_track == Some(track) {
            return;
        }
        self.stop_music();

        let vol = self.effective_volume(self.music_volume);
        let Some(backend) = self.backend.as_mut() else {
            return;
        };
        match backend.start_loop(track, vol) {
            Ok(()) => self.current_track = Some(track),
            Err(e) => log::warn!("Failed to start {:?} music: {}", track, e),
        }
    }

    fn stop_music(&mut self) {
        if self.current_track.take().is_none() {
            return;
        }
        let Some(backend) = self.backend.as_mut() else {
            return;
        };
        if let Err(e) = backend.stop_loop() {
            log::warn!("Failed to stop music: {}", e);
        }
    }
}

/// Backend that only logs what would be played
#[derive(Debug, Default)]
pub struct LogBackend;

impl SoundBackend for LogBackend {
    fn play_clip(&mut self, sound: SoundId, volume: f32) -> Result<(), AudioError> {
        log::trace!("sfx {} at {:.2}", sound.clip_name(), volume);
        Ok(())
    }

    fn start_loop(&mut self, track: MusicTrack, volume: f32) -> Result<(), AudioError> {
        log::trace!("music {} at {:.2}", track.clip_name(), volume);
        Ok(())
    }

    fn stop_loop(&mut self) -> Result<(), AudioError> {
        log::trace!("music stopped");
        Ok(())
    }
}

/// Discards every sound
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentAudio;

impl AudioPort for SilentAudio {
    fn play(&mut self, _sound: SoundId) {}
    fn play_music(&mut self, _track: MusicTrack) {}
    fn stop_music(&mut self) {}
}

/// A call made against an [`AudioPort`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCall {
    Sound(SoundId),
    Music(MusicTrack),
    StopMusic,
}

/// Records calls in order; used to assert on audio cues
#[derive(Debug, Default, Clone)]
pub struct RecordingAudio {
    pub calls: Vec<AudioCall>,
}

impl RecordingAudio {
    pub fn sounds(&self) -> impl Iterator<Item = SoundId> + '_ {
        self.calls.iter().filter_map(|call| match call {
            AudioCall::Sound(id) => Some(*id),
            _ => None,
        })
    }

    pub fn count(&self, sound: SoundId) -> usize {
        self.sounds().filter(|s| *s == sound).count()
    }
}

impl AudioPort for RecordingAudio {
    fn play(&mut self, sound: SoundId) {
        self.calls.push(AudioCall::Sound(sound));
    }

    fn play_music(&mut self, track: MusicTrack) {
        self.calls.push(AudioCall::Music(track));
    }

    fn stop_music(&mut self) {
        self.calls.push(AudioCall::StopMusic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Backend that fails every call and counts attempts
    #[derive(Default)]
    struct BrokenBackend {
        attempts: usize,
    }

    impl SoundBackend for BrokenBackend {
        fn play_clip(&mut self, sound: SoundId, _volume: f32) -> Result<(), AudioError> {
            self.attempts += 1;
            Err(AudioError::MissingClip(sound.clip_name()))
        }

        fn start_loop(&mut self, _track: MusicTrack, _volume: f32) -> Result<(), AudioError> {
            self.attempts += 1;
            Err(AudioError::DeviceUnavailable)
        }

        fn stop_loop(&mut self) -> Result<(), AudioError> {
            self.attempts += 1;
            Err(AudioError::DeviceUnavailable)
        }
    }

    #[derive(Default)]
    struct VolumeSpy {
        last_volume: Option<f32>,
        loops_started: usize,
        loops_stopped: usize,
    }

    impl SoundBackend for VolumeSpy {
        fn play_clip(&mut self, _sound: SoundId, volume: f32) -> Result<(), AudioError> {
            self.last_volume = Some(volume);
            Ok(())
        }

        fn start_loop(&mut self, _track: MusicTrack, _volume: f32) -> Result<(), AudioError> {
            self.loops_started += 1;
            Ok(())
        }

        fn stop_loop(&mut self) -> Result<(), AudioError> {
            self.loops_stopped += 1;
            Ok(())
        }
    }

    #[test]
    fn test_backend_failures_are_swallowed() {
        let mut mixer = Mixer::new(Some(BrokenBackend::default()));
        mixer.play(SoundId::PaddleHit);
        mixer.play_music(MusicTrack::Game);
        mixer.stop_music();
        assert_eq!(mixer.current_track(), None);
        assert_eq!(mixer.backend().map(|b| b.attempts), Some(2));
    }

    #[test]
    fn test_missing_backend_is_silent() {
        let mut mixer: Mixer<LogBackend> = Mixer::new(None);
        mixer.play(SoundId::GameOver);
        mixer.play_music(MusicTrack::Menu);
        assert_eq!(mixer.current_track(), None);
    }

    #[test]
    fn test_mute_skips_effects() {
        let mut mixer = Mixer::new(Some(VolumeSpy::default()));
        mixer.set_muted(true);
        mixer.play(SoundId::ButtonClick);
        assert_eq!(mixer.backend().and_then(|b| b.last_volume), None);

        mixer.set_muted(false);
        mixer.set_master_volume(0.5);
        mixer.set_sfx_volume(2.0);
        mixer.play(SoundId::ButtonClick);
        assert_eq!(mixer.backend().and_then(|b| b.last_volume), Some(0.5));
    }

    #[test]
    fn test_same_track_is_not_restarted() {
        let mut mixer = Mixer::new(Some(VolumeSpy::default()));
        mixer.play_music(MusicTrack::Menu);
        mixer.play_music(MusicTrack::Menu);
        mixer.play_music(MusicTrack::Game);
        let backend = mixer.backend().expect("backend");
        assert_eq!(backend.loops_started, 2);
        assert_eq!(backend.loops_stopped, 1);
        assert_eq!(mixer.current_track(), Some(MusicTrack::Game));
    }

    #[test]
    fn test_recording_audio_counts() {
        let mut audio = RecordingAudio::default();
        audio.play(SoundId::PaddleHit);
        audio.play_music(MusicTrack::Game);
        audio.play(SoundId::PaddleHit);
        assert_eq!(audio.count(SoundId::PaddleHit), 2);
        assert_eq!(audio.calls[1], AudioCall::Music(MusicTrack::Game));
    }
}
