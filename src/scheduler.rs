//! The burst engine.
//!
//! A [`Celebration`] owns the live particle set and moves through
//! `Idle -> Bursting -> (completed) -> Idle`:
//!
//! * activation fills the particle set, optionally plays the audio cue and
//!   requests the first frame;
//! * every delivered frame advances each particle, draws the survivors and
//!   drops particles that have faded out or fallen past the bottom margin;
//! * when nothing is left the burst either re-arms (loop mode, still active)
//!   or fires the completion callback once and goes idle;
//! * deactivation cancels the pending frame and empties the set without
//!   calling the completion callback.
//!
//! Everything runs on the host's thread. The only re-entry point besides the
//! public controls is [`Celebration::on_frame`], and stale frame handles are
//! ignored, so a frame delivered after cancellation never draws.

use crate::audio::{AudioOutput, CueSynthesizer, NullOutput};
use crate::config::BurstOptions;
use crate::frame::{FrameHandle, FrameQueue, FrameScheduler};
use crate::particle::{self, DecayMode, Particle};
use crate::registry::{CelebrationType, Intensity, Registry};
use crate::render::{self, Surface};
use crate::size::SurfaceSizeManager;
use std::rc::Rc;

pub type CompletionCallback = Box<dyn FnMut()>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BurstState {
    Idle,
    Bursting,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BurstStats {
    pub bursts_started: u64,
    pub completions: u64,
    pub cancellations: u64,
    pub particles_spawned: u64,
    pub particles_culled: u64,
    pub ticks: u64,
}

pub struct Celebration<S: Surface, F: FrameScheduler = FrameQueue, A: AudioOutput = NullOutput> {
    registry: Rc<Registry>,
    options: BurstOptions,
    kind: CelebrationType,
    intensity: Intensity,
    decay: DecayMode,
    surface: Option<S>,
    size: SurfaceSizeManager,
    frames: F,
    audio: CueSynthesizer<A>,
    rng: fastrand::Rng,
    particles: Vec<Particle>,
    state: BurstState,
    active: bool,
    pending: Option<FrameHandle>,
    on_complete: Option<CompletionCallback>,
    stats: BurstStats,
}

impl<S: Surface, F: FrameScheduler, A: AudioOutput> Celebration<S, F, A> {
    /// An idle engine with the built-in tables, default options and no surface.
    pub fn new(frames: F, audio: A) -> Self {
        let options = BurstOptions::default();
        Self {
            registry: Rc::new(Registry::builtin()),
            kind: CelebrationType::default(),
            intensity: Intensity::default(),
            decay: options.decay_mode(),
            options,
            surface: None,
            size: SurfaceSizeManager::default(),
            frames,
            audio: CueSynthesizer::new(audio),
            rng: fastrand::Rng::new(),
            particles: Vec::new(),
            state: BurstState::Idle,
            active: false,
            pending: None,
            on_complete: None,
            stats: BurstStats::default(),
        }
    }

    pub fn with_registry(mut self, registry: Rc<Registry>) -> Self {
        self.registry = registry;
        self
    }

    /// Seeded generators make bursts reproducible.
    pub fn with_rng(mut self, rng: fastrand::Rng) -> Self {
        self.rng = rng;
        self
    }

    /// Attach a surface. See [`attach_surface`](Self::attach_surface).
    pub fn with_surface(mut self, surface: S) -> Self {
        self.attach_surface(surface);
        self
    }

    pub fn with_container_size(mut self, width: u32, height: u32) -> Self {
        self.size.sync(width, height, self.surface.as_mut());
        self
    }

    pub fn on_complete(&mut self, callback: impl FnMut() + 'static) {
        self.on_complete = Some(Box::new(callback));
    }

    /// Replace the options. A change of `active` acts as the matching edge;
    /// everything else takes effect at the next burst.
    pub fn apply(&mut self, options: BurstOptions) {
        let active = options.active;
        self.decay = options.decay_mode();
        self.options = options;
        self.set_active(active);
    }

    /// Edge-triggered activation. Turning on starts a burst when `auto_start`
    /// is set; turning off cancels any burst in progress.
    pub fn set_active(&mut self, active: bool) {
        self.options.active = active;
        match (self.active, active) {
            (false, true) => {
                self.active = true;
                if self.options.auto_start {
                    self.begin();
                }
            }
            (true, false) => self.stop(),
            _ => {}
        }
    }

    /// Start a burst now. Does nothing while one is already running.
    pub fn start(&mut self) {
        self.active = true;
        self.options.active = true;
        if self.state == BurstState::Bursting {
            log::trace!("start ignored, burst already running");
            return;
        }
        self.begin();
    }

    /// Start a burst from a specific point, replacing the configured origin.
    pub fn start_at(&mut self, x: f32, y: f32) {
        self.options.origin_x = Some(x);
        self.options.origin_y = Some(y);
        self.start();
    }

    /// Cancel the pending frame and drop every particle. Safe to call at any
    /// time, any number of times.
    pub fn stop(&mut self) {
        self.active = false;
        self.options.active = false;
        if let Some(handle) = self.pending.take() {
            self.frames.cancel_frame(handle);
        }
        if self.state == BurstState::Bursting {
            log::debug!("{} burst cancelled with {} particles live", self.kind, self.particles.len());
            self.stats.cancellations += 1;
            if let Some(surface) = self.surface.as_mut() {
                surface.clear();
            }
        }
        self.particles.clear();
        self.state = BurstState::Idle;
        self.audio.release();
    }

    /// Run one tick. `dt` is the time since the previous frame in seconds and
    /// only matters for [`DecayMode::PerSecond`].
    pub fn on_frame(&mut self, handle: FrameHandle, dt: f32) {
        if self.pending != Some(handle) {
            log::trace!("ignoring stale frame {}", handle.id());
            return;
        }
        self.pending = None;
        self.stats.ticks += 1;

        let limit = self.size.height() + self.options.off_screen_margin;
        let decay = self.decay;
        let surface = &mut self.surface;
        if let Some(surface) = surface.as_mut() {
            surface.clear();
        }

        let before = self.particles.len();
        self.particles.retain_mut(|p| {
            particle::advance(p, decay, dt);
            if p.is_alive() && p.y < limit {
                if let Some(surface) = surface.as_mut() {
                    render::draw_particle(surface, p);
                }
                true
            } else {
                false
            }
        });
        self.stats.particles_culled += (before - self.particles.len()) as u64;

        if self.particles.is_empty() {
            self.complete();
        } else {
            self.pending = Some(self.frames.request_frame());
        }
    }

    /// Forward a container resize to the surface. Live particles keep their
    /// coordinates.
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.size.sync(width, height, self.surface.as_mut()) {
            log::debug!("surface resized to {width}x{height}");
        }
    }

    /// Attach a surface and return the previous one. A known container size
    /// is pushed to the surface; while the container is still 0x0 the
    /// surface's own size becomes the container size.
    pub fn attach_surface(&mut self, mut surface: S) -> Option<S> {
        self.size.mount(Some(&mut surface));
        self.surface.replace(surface)
    }

    /// Without a surface, ticks still simulate and cull but draw nothing.
    pub fn detach_surface(&mut self) -> Option<S> {
        self.surface.take()
    }

    pub fn state(&self) -> BurstState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn stats(&self) -> BurstStats {
        self.stats
    }

    pub fn options(&self) -> &BurstOptions {
        &self.options
    }

    /// Type and intensity of the current or most recent burst.
    pub fn current(&self) -> (CelebrationType, Intensity) {
        (self.kind, self.intensity)
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn container_size(&self) -> (u32, u32) {
        self.size.size()
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> Option<&mut S> {
        self.surface.as_mut()
    }

    pub fn frames(&self) -> &F {
        &self.frames
    }

    pub fn audio_output(&self) -> &A {
        self.audio.output()
    }

    fn begin(&mut self) {
        self.kind = CelebrationType::from_name(&self.options.kind).unwrap_or_else(|| {
            log::warn!("unknown celebration type {:?}, using confetti", self.options.kind);
            CelebrationType::default()
        });
        self.intensity = Intensity::from_name(&self.options.intensity).unwrap_or_else(|| {
            log::warn!("unknown intensity {:?}, using normal", self.options.intensity);
            Intensity::default()
        });

        let profile = self.registry.profile(self.kind);
        let preset = self.registry.preset(self.intensity);
        let count = profile.burst_size(preset);
        let (width, height) = (self.size.width(), self.size.height());
        let (origin_x, origin_y) = (self.options.origin_x, self.options.origin_y);

        self.particles.clear();
        self.particles.reserve(count);
        for _ in 0..count {
            let p = particle::create_particle(&mut self.rng, profile, width, height, origin_x, origin_y);
            self.particles.push(p);
        }

        self.state = BurstState::Bursting;
        self.stats.bursts_started += 1;
        self.stats.particles_spawned += count as u64;
        log::debug!("{} burst started: {} x{} -> {count} particles", self.kind, self.intensity, preset.multiplier);

        if self.options.sound_enabled {
            self.audio.play(self.kind, self.intensity);
        }

        if let Some(stale) = self.pending.take() {
            self.frames.cancel_frame(stale);
        }
        self.pending = Some(self.frames.request_frame());
    }

    fn complete(&mut self) {
        self.state = BurstState::Idle;

        if self.options.looping && self.active {
            log::trace!("{} burst finished, looping", self.kind);
            self.begin();
            return;
        }

        self.stats.completions += 1;
        log::debug!("{} burst complete after {} ticks", self.kind, self.stats.ticks);
        if let Some(callback) = self.on_complete.as_mut() {
            callback();
        }
    }
}

impl<S: Surface, A: AudioOutput> Celebration<S, FrameQueue, A> {
    /// Deliver the due frame from a [`FrameQueue`], if there is one.
    pub fn pump(&mut self, dt: f32) -> bool {
        match self.frames.take_due() {
            Some(handle) => {
                self.on_frame(handle, dt);
                true
            }
            None => false,
        }
    }
}

impl<S: Surface, F: FrameScheduler, A: AudioOutput> Drop for Celebration<S, F, A> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.frames.cancel_frame(handle);
        }
        self.particles.clear();
        self.audio.release();
    }
}
