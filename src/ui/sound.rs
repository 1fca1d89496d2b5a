/// Sound engine: procedural background music and jingles via rodio.
///
/// All sounds are generated as in-memory WAV buffers at init time.
/// Jingles are fire-and-forget (non-blocking) via rodio's Sink; the music
/// track loops on its own Sink until stopped.
///
/// Compile with `--no-default-features` or without "sound" feature
/// to disable audio entirely (the stub SoundEngine does nothing).

use crate::sim::event::GameEvent;

#[cfg(feature = "sound")]
mod inner {
    use std::io::Cursor;
    use std::sync::Arc;

    use rodio::{OutputStream, OutputStreamHandle, Sink, Source};
    use tracing::{debug, warn};

    pub(super) const SAMPLE_RATE: u32 = 22050;

    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        volume: f32,
        music: Option<Sink>,
        music_wav: Arc<Vec<u8>>,
        sfx_coin: Arc<Vec<u8>>,
        sfx_defeat: Arc<Vec<u8>>,
        sfx_victory: Arc<Vec<u8>>,
    }

    impl SoundEngine {
        /// `None` when there is no usable output device.
        pub fn new(volume: f32) -> Option<Self> {
            let (stream, handle) = match OutputStream::try_default() {
                Ok(pair) => pair,
                Err(e) => {
                    warn!(error = %e, "no audio device, continuing without sound");
                    return None;
                }
            };

            Some(SoundEngine {
                _stream: stream,
                handle,
                volume,
                music: None,
                music_wav: Arc::new(make_wav(&gen_music_loop())),
                sfx_coin: Arc::new(make_wav(&gen_coin())),
                sfx_defeat: Arc::new(make_wav(&gen_defeat())),
                sfx_victory: Arc::new(make_wav(&gen_victory())),
            })
        }

        fn play(&self, buf: &Arc<Vec<u8>>) {
            if let Ok(sink) = Sink::try_new(&self.handle) {
                let cursor = Cursor::new(buf.as_ref().clone());
                if let Ok(src) = rodio::Decoder::new(cursor) {
                    sink.append(src);
                    sink.detach(); // fire-and-forget
                }
            }
        }

        /// (Re)start the looping track from the beginning.
        pub fn start_music(&mut self) {
            self.stop_music();
            let sink = match Sink::try_new(&self.handle) {
                Ok(s) => s,
                Err(e) => {
                    warn!(error = %e, "could not open music sink");
                    return;
                }
            };
            let cursor = Cursor::new(self.music_wav.as_ref().clone());
            match rodio::Decoder::new(cursor) {
                Ok(src) => {
                    sink.set_volume(self.volume);
                    sink.append(src.repeat_infinite());
                    self.music = Some(sink);
                    debug!("music started");
                }
                Err(e) => warn!(error = %e, "could not decode music"),
            }
        }

        pub fn stop_music(&mut self) {
            if let Some(sink) = self.music.take() {
                sink.stop();
                debug!("music stopped");
            }
        }

        pub fn play_coin(&self) { self.play(&self.sfx_coin); }
        pub fn play_defeat(&self) { self.play(&self.sfx_defeat); }
        pub fn play_victory(&self) { self.play(&self.sfx_victory); }
    }

    // ════════════════════════════════════════════════════════════
    //  Waveform generators: all produce Vec<f32> mono samples
    // ════════════════════════════════════════════════════════════

    const TAU: f32 = 2.0 * std::f32::consts::PI;

    /// Square-ish note (sine plus 3rd harmonic) with a soft decay.
    fn push_note(samples: &mut Vec<f32>, freq: f32, duration: f32, volume: f32) {
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        for i in 0..n {
            let t = i as f32 / SAMPLE_RATE as f32;
            let env = 1.0 - (i as f32 / n as f32) * 0.6;
            let wave = (t * freq * TAU).sin() * 0.7 + (t * freq * 3.0 * TAU).sin() * 0.3;
            samples.push(wave * env * volume);
        }
    }

    /// Coin: quick ascending B5→E6
    pub(super) fn gen_coin() -> Vec<f32> {
        let mut samples = Vec::new();
        push_note(&mut samples, 988.0, 0.05, 0.25);
        push_note(&mut samples, 1319.0, 0.12, 0.25);
        samples
    }

    /// Defeat: sad descending A4→F#4→Eb4→C4 with a final fade
    pub(super) fn gen_defeat() -> Vec<f32> {
        let mut samples = Vec::new();
        for freq in [440.0_f32, 370.0, 311.0, 261.0] {
            push_note(&mut samples, freq, 0.12, 0.3);
        }
        let fade_len = samples.len() / 4;
        let total = samples.len();
        for (i, s) in samples.iter_mut().enumerate().skip(total - fade_len) {
            *s *= (total - i) as f32 / fade_len as f32;
        }
        samples
    }

    /// Victory: ascending fanfare C5→E5→G5→C6, last note sustained
    pub(super) fn gen_victory() -> Vec<f32> {
        let mut samples = Vec::new();
        for freq in [523.0_f32, 659.0, 784.0] {
            push_note(&mut samples, freq, 0.1, 0.3);
        }
        push_note(&mut samples, 1047.0, 0.35, 0.3);
        samples
    }

    /// Background loop: a short bass line under an arpeggio, 8 beats.
    pub(super) fn gen_music_loop() -> Vec<f32> {
        const BEAT: f32 = 0.25;
        let melody = [523.0_f32, 659.0, 784.0, 659.0, 587.0, 698.0, 880.0, 698.0];
        let bass = [131.0_f32, 131.0, 131.0, 131.0, 147.0, 147.0, 147.0, 147.0];
        let n = (SAMPLE_RATE as f32 * BEAT) as usize;
        let mut samples = Vec::with_capacity(n * melody.len());
        for (&lead, &low) in melody.iter().zip(bass.iter()) {
            for i in 0..n {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32) * 0.5;
                let wave = (t * lead * TAU).sin() * 0.5 * env + (t * low * TAU).sin() * 0.5;
                samples.push(wave * 0.2);
            }
        }
        samples
    }

    // ════════════════════════════════════════════════════════════
    //  WAV encoder: wraps f32 samples into a valid WAV buffer
    // ════════════════════════════════════════════════════════════

    pub(super) fn make_wav(samples: &[f32]) -> Vec<u8> {
        let num_channels: u16 = 1;
        let bits_per_sample: u16 = 16;
        let byte_rate = SAMPLE_RATE * (num_channels as u32) * (bits_per_sample as u32) / 8;
        let block_align = num_channels * bits_per_sample / 8;
        let data_size = samples.len() as u32 * 2; // 16-bit = 2 bytes per sample
        let file_size = 36 + data_size;

        let mut buf = Vec::with_capacity(44 + data_size as usize);

        // RIFF header
        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&file_size.to_le_bytes());
        buf.extend_from_slice(b"WAVE");

        // fmt chunk
        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes()); // chunk size
        buf.extend_from_slice(&1u16.to_le_bytes()); // PCM format
        buf.extend_from_slice(&num_channels.to_le_bytes());
        buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        buf.extend_from_slice(&byte_rate.to_le_bytes());
        buf.extend_from_slice(&block_align.to_le_bytes());
        buf.extend_from_slice(&bits_per_sample.to_le_bytes());

        // data chunk
        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&data_size.to_le_bytes());

        for &s in samples {
            let val = (s.clamp(-1.0, 1.0) * 32767.0) as i16;
            buf.extend_from_slice(&val.to_le_bytes());
        }

        buf
    }
}

// ════════════════════════════════════════════════════════════
//  Public API: compiles to no-ops when sound feature is off
// ════════════════════════════════════════════════════════════

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new(_volume: f32) -> Option<Self> { Some(SoundEngine) }
    pub fn start_music(&mut self) {}
    pub fn stop_music(&mut self) {}
    pub fn play_coin(&self) {}
    pub fn play_defeat(&self) {}
    pub fn play_victory(&self) {}
}

impl SoundEngine {
    /// React to one simulation event. `music_on` is the session's setting
    /// after the event was applied.
    pub fn on_event(&mut self, event: GameEvent, music_on: bool) {
        match event {
            GameEvent::SessionStarted | GameEvent::MusicToggled { .. } if music_on => self.start_music(),
            GameEvent::MusicToggled { .. } => self.stop_music(),
            GameEvent::SessionStarted => {}
            GameEvent::CoinCollected { .. } => self.play_coin(),
            GameEvent::HeroDefeated => self.play_defeat(),
            GameEvent::Victory => self.play_victory(),
        }
    }
}
