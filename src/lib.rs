//! Celebration particle bursts.
//!
//! A [`Celebration`] engine spawns a burst of confetti, sparkles, coins,
//! hearts or stars, animates it one host-delivered frame at a time onto a
//! [`Surface`], and reports when the burst has played out. The host supplies
//! the frame scheduling ([`FrameScheduler`]), the drawing target and
//! optionally an [`AudioOutput`] for the start cue.

pub mod audio;
pub mod color;
pub mod config;
pub mod error;
pub mod frame;
pub mod particle;
pub mod registry;
pub mod render;
pub mod scheduler;
pub mod size;

pub use audio::{AudioOutput, CueSynthesizer, NullOutput, Tone};
pub use color::Color;
pub use config::{BurstOptions, DecayClock, FileConfig, HostConfig};
pub use error::{AudioError, ConfigError};
pub use frame::{FrameHandle, FrameQueue, FrameScheduler};
pub use particle::{DecayMode, Particle, ShapeKind};
pub use registry::{CelebrationType, Intensity, IntensityPreset, ParticleProfile, Registry};
pub use render::Surface;
pub use scheduler::{BurstState, BurstStats, Celebration};
pub use size::SurfaceSizeManager;
