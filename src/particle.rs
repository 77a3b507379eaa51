use crate::color::Color;
use crate::registry::ParticleProfile;
use std::f32::consts::PI;

/// Life removed from every particle on each scheduled tick.
pub const LIFE_DECAY: f32 = 0.01;

const SPEED_MIN: f32 = 8.0;
const SPEED_MAX: f32 = 20.0;
const SIZE_MIN: f32 = 6.0;
const SIZE_MAX: f32 = 16.0;
const SPIN_MAX: f32 = 7.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Square,
    Rectangle,
    Circle,
    Star,
    Coin,
    Heart,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub size: f32,
    /// Degrees.
    pub rotation: f32,
    /// Degrees per tick.
    pub rotation_speed: f32,
    pub shape: ShapeKind,
    pub color: Color,
    pub gravity: f32,
    life: f32,
}

impl Particle {
    pub fn life(&self) -> f32 {
        self.life
    }

    /// Always `max(0, life)`; there is no separately stored opacity.
    pub fn opacity(&self) -> f32 {
        self.life.max(0.0)
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }
}

/// How [`advance`] decrements life.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DecayMode {
    /// Fixed amount per tick, independent of elapsed time. Burst length then
    /// depends on how often the host delivers frames.
    PerTick(f32),
    /// `rate * dt` per tick, for hosts that want refresh-rate independence.
    PerSecond(f32),
}

impl DecayMode {
    fn amount(self, dt: f32) -> f32 {
        match self {
            DecayMode::PerTick(step) => step.max(0.0),
            DecayMode::PerSecond(rate) => (rate * dt).max(0.0),
        }
    }
}

impl Default for DecayMode {
    fn default() -> Self {
        DecayMode::PerTick(LIFE_DECAY)
    }
}

fn uniform(rng: &mut fastrand::Rng, min: f32, max: f32) -> f32 {
    min + rng.f32() * (max - min)
}

fn pick<T: Copy>(rng: &mut fastrand::Rng, items: &[T]) -> Option<T> {
    if items.is_empty() {
        None
    } else {
        Some(items[rng.usize(0..items.len())])
    }
}

/// Build one particle from `profile`. Each origin coordinate that is not
/// given defaults to the center of the surface on that axis.
///
/// The direction is drawn from a cone of `profile.spread` degrees centered on
/// straight up (negative y), with a speed between 8 and 20 px per tick.
pub fn create_particle(
    rng: &mut fastrand::Rng,
    profile: &ParticleProfile,
    surface_width: f32,
    surface_height: f32,
    origin_x: Option<f32>,
    origin_y: Option<f32>,
) -> Particle {
    let x = origin_x.unwrap_or(surface_width / 2.0);
    let y = origin_y.unwrap_or(surface_height / 2.0);

    let offset = uniform(rng, -profile.spread / 2.0, profile.spread / 2.0);
    let angle = (offset - 90.0) * PI / 180.0;
    let speed = uniform(rng, SPEED_MIN, SPEED_MAX);

    let shape = pick(rng, &profile.shapes).unwrap_or(ShapeKind::Square);
    let color = pick(rng, &profile.colors).unwrap_or(Color::WHITE);

    Particle {
        x,
        y,
        vx: angle.cos() * speed,
        vy: angle.sin() * speed,
        size: uniform(rng, SIZE_MIN, SIZE_MAX),
        rotation: rng.f32() * 360.0,
        rotation_speed: uniform(rng, -SPIN_MAX, SPIN_MAX),
        shape,
        color,
        gravity: profile.gravity,
        life: 1.0,
    }
}

/// One simulation tick for one particle.
pub fn advance(particle: &mut Particle, decay: DecayMode, dt: f32) {
    particle.vy += particle.gravity;
    particle.x += particle.vx;
    particle.y += particle.vy;
    particle.rotation += particle.rotation_speed;
    particle.life -= decay.amount(dt);
}
