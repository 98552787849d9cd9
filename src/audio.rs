//! Audio using the Web Audio API
//!
//! Effects are synthesized with oscillators, no sample files needed. The
//! background track is a looping `<audio>` element.

use web_sys::{AudioContext, GainNode, HtmlAudioElement, OscillatorNode, OscillatorType};

use crate::settings::Settings;
use crate::sim::GameEvent;

/// Bundled background track
const MUSIC_SRC: &str = "assets/music.mp3";

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Engine revs up as the game starts
    Start,
    /// Oncoming car passed
    Overtake,
    /// Cars collide
    Crash,
    /// Back to the start screen
    Reset,
}

impl SoundEffect {
    pub fn for_event(event: GameEvent) -> Self {
        match event {
            GameEvent::Started => SoundEffect::Start,
            GameEvent::Overtaken { .. } => SoundEffect::Overtake,
            GameEvent::Crashed { .. } => SoundEffect::Crash,
            GameEvent::Reset => SoundEffect::Reset,
        }
    }
}

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    music: Option<HtmlAudioElement>,
    settings: Settings,
}

impl AudioManager {
    pub fn new(settings: Settings) -> Self {
        // May fail outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }

        let music = HtmlAudioElement::new_with_src(MUSIC_SRC).ok();
        match &music {
            Some(el) => el.set_loop(true),
            None => log::warn!("Failed to create music element"),
        }

        let manager = Self {
            ctx,
            music,
            settings,
        };
        manager.apply_music_volume();
        manager
    }

    /// Resume the audio context and start the music.
    /// Browsers only allow this from inside a user gesture.
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }
        }
        self.play_music();
    }

    fn play_music(&self) {
        if self.settings.music_gain() <= 0.0 {
            return;
        }
        if let Some(music) = &self.music {
            if music.paused() {
                // The returned promise rejects if autoplay is blocked; the
                // next gesture tries again
                let _ = music.play();
            }
        }
    }

    fn apply_music_volume(&self) {
        if let Some(music) = &self.music {
            music.set_volume(f64::from(self.settings.music_gain()));
        }
    }

    /// Mute or unmute everything and return the settings to persist
    pub fn toggle_muted(&mut self) -> &Settings {
        let muted = self.settings.toggle_muted();
        self.apply_music_volume();
        if muted {
            if let Some(music) = &self.music {
                let _ = music.pause();
            }
        } else {
            self.play_music();
        }
        log::info!("Audio {}", if muted { "muted" } else { "unmuted" });
        &self.settings
    }

    /// Play the effect for a game event
    pub fn on_event(&self, event: GameEvent) {
        self.play(SoundEffect::for_event(event));
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.settings.sfx_gain();
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        match effect {
            SoundEffect::Start => self.play_start(ctx, vol),
            SoundEffect::Overtake => self.play_overtake(ctx, vol),
            SoundEffect::Crash => self.play_crash(ctx, vol),
            SoundEffect::Reset => self.play_reset(ctx, vol),
        }
    }

    // === Sound generators ===

    /// Create an oscillator with gain envelope
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Start - engine rev
    fn play_start(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 80.0, OscillatorType::Sawtooth) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.25, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.6)
            .ok();
        osc.frequency().set_value_at_time(80.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(320.0, t + 0.5)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.65).ok();
    }

    /// Overtake - quick doppler swoosh
    fn play_overtake(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 700.0, OscillatorType::Triangle) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.2, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.18)
            .ok();
        osc.frequency().set_value_at_time(700.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(350.0, t + 0.15)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.2).ok();
    }

    /// Crash - boom, then a sad descending line
    fn play_crash(&self, ctx: &AudioContext, vol: f32) {
        if let Some((osc, gain)) = self.create_osc(ctx, 100.0, OscillatorType::Sawtooth) {
            let t = ctx.current_time();
            gain.gain().set_value_at_time(vol * 0.5, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.4)
                .ok();
            osc.frequency().set_value_at_time(100.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(30.0, t + 0.4)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.5).ok();
        }

        // High frequency crunch
        if let Some((osc, gain)) = self.create_osc(ctx, 1500.0, OscillatorType::Square) {
            let t = ctx.current_time();
            gain.gain().set_value_at_time(vol * 0.2, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.1)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.15).ok();
        }

        for (i, freq) in [400.0, 350.0, 300.0, 200.0].iter().enumerate() {
            let delay = 0.5 + i as f64 * 0.2;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.3, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.4).ok();
            }
        }
    }

    /// Reset - soft click
    fn play_reset(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 600.0, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.2, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.08)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.1).ok();
    }
}
