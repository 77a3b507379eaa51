use proptest::prelude::*;
use sparkburst::particle::{self, DecayMode};
use sparkburst::render::recording::RecordingSurface;
use sparkburst::{
    BurstOptions, Celebration, CelebrationType, FrameQueue, Intensity, IntensityPreset, NullOutput, ParticleProfile,
    Registry,
};
use std::rc::Rc;
use std::time::Duration;

fn kind() -> impl Strategy<Value = CelebrationType> {
    prop::sample::select(CelebrationType::ALL.to_vec())
}

fn intensity() -> impl Strategy<Value = Intensity> {
    prop::sample::select(Intensity::ALL.to_vec())
}

fn decay() -> impl Strategy<Value = DecayMode> {
    prop_oneof![
        (0.001f32..0.2).prop_map(DecayMode::PerTick),
        (0.1f32..5.0).prop_map(DecayMode::PerSecond),
    ]
}

proptest! {
    #[test]
    fn opacity_tracks_life_and_life_never_rises(
        seed in any::<u64>(),
        kind in kind(),
        decay in decay(),
        dt in 0.0f32..0.1,
    ) {
        let registry = Registry::builtin();
        let mut rng = fastrand::Rng::with_seed(seed);
        let mut p = particle::create_particle(&mut rng, registry.profile(kind), 640.0, 480.0, None, None);

        for _ in 0..300 {
            let before = p.life();
            particle::advance(&mut p, decay, dt);
            prop_assert!(p.life() <= before);
            prop_assert_eq!(p.opacity(), p.life().max(0.0));
            prop_assert!((0.0..=1.0).contains(&p.opacity()));
        }
    }

    #[test]
    fn burst_size_is_floor_of_scaled_count(
        count in 0u32..400,
        multiplier in 0.0f32..4.0,
        kind in kind(),
        intensity in intensity(),
    ) {
        let mut profile = Registry::builtin().profile(kind).clone();
        profile.count = count;
        let preset = IntensityPreset { multiplier, duration: Duration::from_secs(3) };
        let registry = Registry::builtin().with_profile(kind, profile).with_preset(intensity, preset);

        let mut engine: Celebration<RecordingSurface> = Celebration::new(FrameQueue::new(), NullOutput)
            .with_surface(RecordingSurface::new(320, 240))
            .with_registry(Rc::new(registry));
        engine.apply(BurstOptions {
            kind: kind.name().to_string(),
            intensity: intensity.name().to_string(),
            active: true,
            ..BurstOptions::default()
        });

        let expected = (f64::from(count) * f64::from(multiplier)).floor() as usize;
        prop_assert_eq!(engine.particles().len(), expected);
    }

    #[test]
    fn emission_stays_inside_the_cone(seed in any::<u64>(), spread in 0.0f32..360.0) {
        let profile = ParticleProfile {
            spread,
            ..Registry::builtin().profile(CelebrationType::Stars).clone()
        };
        let mut rng = fastrand::Rng::with_seed(seed);
        let p = particle::create_particle(&mut rng, &profile, 100.0, 100.0, None, None);

        // Angle measured from straight up, in degrees.
        let off_vertical = p.vx.atan2(-p.vy).to_degrees().abs();
        prop_assert!(off_vertical <= spread / 2.0 + 0.01);
    }

    #[test]
    fn every_burst_eventually_empties(seed in any::<u64>(), kind in kind(), intensity in intensity()) {
        let mut engine: Celebration<RecordingSurface> = Celebration::new(FrameQueue::new(), NullOutput)
            .with_surface(RecordingSurface::new(800, 600))
            .with_rng(fastrand::Rng::with_seed(seed));
        engine.apply(BurstOptions {
            kind: kind.name().to_string(),
            intensity: intensity.name().to_string(),
            active: true,
            ..BurstOptions::default()
        });

        let mut ticks = 0;
        while engine.pump(1.0 / 60.0) {
            ticks += 1;
        }
        prop_assert!(ticks <= 102);
        prop_assert!(engine.particles().is_empty());
        prop_assert_eq!(engine.stats().completions, 1);
    }
}
