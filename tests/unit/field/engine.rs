use super::*;
use crate::foundation::core::{PixelSize, Rect};
use crate::surface::recording::{DrawCmd, RecordingSurface};

fn vp(w: f64, h: f64) -> Viewport {
    Viewport::new(w, h).unwrap()
}

fn quiet_config() -> FieldConfig {
    FieldConfig {
        star_count: 20,
        orb_count: 2,
        meteor_interval: 1_000_000,
        ..FieldConfig::default()
    }
}

fn field(cfg: FieldConfig) -> ParticleField<RecordingSurface> {
    ParticleField::new(RecordingSurface::new(), vp(320.0, 240.0), 2.0, cfg, 11).unwrap()
}

fn in_bounds(p: Point, v: Viewport, margin: f64) -> bool {
    p.x >= -margin && p.x <= v.width + margin && p.y >= -margin && p.y <= v.height + margin
}

#[test]
fn construction_sizes_surface_for_pixel_ratio() {
    let f = field(quiet_config());
    let s = f.surface();
    assert_eq!(
        s.pixel_size(),
        Some(PixelSize {
            width: 640,
            height: 480
        })
    );
    assert_eq!(s.css_size(), Some(vp(320.0, 240.0)));
    assert_eq!(s.transform(), Affine::scale(2.0));
    assert_eq!(f.stars().len(), 20);
    assert_eq!(f.orbs().len(), 2);
    assert!(f.meteors().is_empty());
}

#[test]
fn invalid_pixel_ratio_falls_back_to_one() {
    let f = ParticleField::new(
        RecordingSurface::new(),
        vp(100.0, 50.0),
        f64::NAN,
        quiet_config(),
        1,
    )
    .unwrap();
    assert_eq!(f.device_pixel_ratio(), 1.0);
    assert_eq!(
        f.surface().pixel_size(),
        Some(PixelSize {
            width: 100,
            height: 50
        })
    );
}

#[test]
fn surface_that_cannot_be_sized_fails_construction() {
    let surface = RecordingSurface::new().with_max_pixels(10);
    let res = ParticleField::new(surface, vp(100.0, 100.0), 1.0, quiet_config(), 1);
    assert!(res.is_err());
}

#[test]
fn same_seed_same_population() {
    let a = field(quiet_config());
    let b = field(quiet_config());
    assert_eq!(a.stars(), b.stars());
    assert_eq!(a.orbs(), b.orbs());
}

#[test]
fn population_is_conserved_and_bounded() {
    let cfg = FieldConfig {
        star_count: 60,
        orb_count: 4,
        // Fast drift so wrapping is exercised many times.
        star_drift_x: 9.0,
        star_drift_y: [3.0, 12.0],
        orb_speed: 25.0,
        meteor_interval: 5,
        meteor_jitter: 5,
        ..FieldConfig::default()
    };
    let mut f = field(cfg);
    let v = f.viewport();
    for _ in 0..1500 {
        f.tick().unwrap();
        assert_eq!(f.stars().len(), 60);
        assert_eq!(f.orbs().len(), 4);
        for s in f.stars() {
            assert!(in_bounds(s.pos, v, f.config().star_margin), "{:?}", s.pos);
        }
        for o in f.orbs() {
            assert!(in_bounds(o.pos, v, f.config().orb_margin), "{:?}", o.pos);
        }
        f.surface_mut().take_commands();
    }
    assert_eq!(f.frames(), 1500);
}

#[test]
fn meteors_are_removed_once_life_is_spent() {
    let cfg = FieldConfig {
        meteor_interval: 1,
        meteor_jitter: 0,
        meteor_life: [3, 3],
        ..quiet_config()
    };
    let mut f = field(cfg);
    let mut peak = 0;
    for _ in 0..200 {
        f.tick().unwrap();
        peak = peak.max(f.meteors().len());
        for m in f.meteors() {
            assert!(m.life <= m.max_life);
        }
        f.surface_mut().take_commands();
    }
    // One spawn every other frame, each living three frames.
    assert_eq!(peak, 2);
}

#[test]
fn meteors_drain_when_spawning_stops() {
    let cfg = FieldConfig {
        meteor_interval: 1,
        meteor_jitter: 0,
        ..quiet_config()
    };
    let mut f = field(cfg);
    for _ in 0..20 {
        f.tick().unwrap();
    }
    assert!(!f.meteors().is_empty());

    // Stop the timer from firing again; every live meteor must age out.
    f.meteor_threshold = u32::MAX;
    let longest = f.config().meteor_life[1] as usize;
    for _ in 0..=longest {
        f.tick().unwrap();
    }
    assert!(f.meteors().is_empty());
}

#[test]
fn meteor_timer_fires_after_threshold_and_rearms() {
    let cfg = FieldConfig {
        meteor_interval: 10,
        meteor_jitter: 0,
        ..quiet_config()
    };
    let mut f = field(cfg);
    assert_eq!(f.frames_until_meteor(), 11);
    for _ in 0..10 {
        f.tick().unwrap();
    }
    assert!(f.meteors().is_empty());
    assert_eq!(f.frames_until_meteor(), 1);
    f.tick().unwrap();
    assert_eq!(f.meteors().len(), 1);
    assert_eq!(f.frames_until_meteor(), 11);
}

#[test]
fn frame_starts_with_clear_then_gradient_background() {
    let mut f = field(quiet_config());
    f.surface_mut().take_commands();
    f.tick().unwrap();

    let cmds = f.surface().commands();
    let bounds = Rect::new(0.0, 0.0, 320.0, 240.0);
    assert_eq!(cmds[0], DrawCmd::Clear(bounds));
    match &cmds[1] {
        DrawCmd::FillRect {
            rect,
            paint: Paint::Linear { start, end, stops },
            blend,
        } => {
            assert_eq!(*rect, bounds);
            assert_eq!(*blend, Blend::Normal);
            assert_eq!(start.y, 0.0);
            assert_eq!(end.y, 240.0);
            assert_ne!(stops[0].color, stops[1].color);
        }
        other => panic!("expected gradient fill, got {other:?}"),
    }
    assert_eq!(cmds.last(), Some(&DrawCmd::Present));
}

#[test]
fn each_star_draws_glow_before_core() {
    let mut f = field(quiet_config());
    f.surface_mut().take_commands();
    f.tick().unwrap();

    let circles: Vec<&DrawCmd> = f
        .surface()
        .commands()
        .iter()
        .filter(|c| matches!(c, DrawCmd::FillCircle { .. }))
        .collect();
    // Orbs first, then a (glow, core) pair per star.
    assert_eq!(circles.len(), 2 + 2 * 20);

    for pair in circles[2..].chunks(2) {
        let (
            DrawCmd::FillCircle {
                radius: glow_r,
                paint: Paint::Radial { .. },
                blend: Blend::Lighter,
                center: glow_c,
            },
            DrawCmd::FillCircle {
                radius: core_r,
                paint: Paint::Solid(_),
                blend: Blend::Normal,
                center: core_c,
            },
        ) = (pair[0], pair[1])
        else {
            panic!("unexpected star draw order: {pair:?}");
        };
        assert_eq!(glow_c, core_c);
        assert!(glow_r > core_r);
    }
}

#[test]
fn orbs_are_additive_radial_fades() {
    let mut f = field(quiet_config());
    f.surface_mut().take_commands();
    f.tick().unwrap();

    let orb_draws: Vec<&DrawCmd> = f
        .surface()
        .commands()
        .iter()
        .filter(|c| matches!(c, DrawCmd::FillCircle { .. }))
        .take(2)
        .collect();
    for cmd in orb_draws {
        let DrawCmd::FillCircle {
            paint: Paint::Radial { stops, .. },
            blend,
            ..
        } = cmd
        else {
            panic!("orb must be a radial fill");
        };
        assert_eq!(*blend, Blend::Lighter);
        assert_eq!(stops.last().map(|s| s.color.a), Some(0));
    }
}

#[test]
fn meteors_draw_additive_trail_and_head() {
    let cfg = FieldConfig {
        meteor_interval: 1,
        meteor_jitter: 0,
        ..quiet_config()
    };
    let mut f = field(cfg);
    f.tick().unwrap();
    f.surface_mut().take_commands();
    f.tick().unwrap();
    assert_eq!(f.meteors().len(), 1);

    let cmds = f.surface().commands();
    let trail = cmds
        .iter()
        .position(|c| matches!(c, DrawCmd::StrokeLine { .. }))
        .expect("trail stroke");
    match (&cmds[trail], &cmds[trail + 1]) {
        (
            DrawCmd::StrokeLine {
                from,
                to,
                blend: Blend::Lighter,
                paint: Paint::Linear { .. },
                ..
            },
            DrawCmd::FillCircle {
                center,
                blend: Blend::Lighter,
                ..
            },
        ) => {
            assert_eq!(from, center);
            assert!(from.distance(*to) > 0.0);
        }
        other => panic!("unexpected meteor draw: {other:?}"),
    }
}

#[test]
fn resize_refits_surface_without_touching_particles() {
    let mut f = field(quiet_config());
    f.tick().unwrap();
    let before = f.stars().to_vec();

    f.resize(vp(100.0, 80.0), 3.0).unwrap();
    assert_eq!(f.stars(), before.as_slice());
    assert_eq!(
        f.surface().pixel_size(),
        Some(PixelSize {
            width: 300,
            height: 240
        })
    );
    assert_eq!(f.surface().transform(), Affine::scale(3.0));

    // Particles outside the smaller viewport come back within bounds on the next step.
    f.tick().unwrap();
    let v = f.viewport();
    assert_eq!(f.stars().len(), before.len());
    for s in f.stars() {
        assert!(in_bounds(s.pos, v, f.config().star_margin));
    }
}

#[test]
fn failed_resize_keeps_previous_geometry() {
    let surface = RecordingSurface::new().with_max_pixels(640 * 480);
    let mut f = ParticleField::new(surface, vp(320.0, 240.0), 2.0, quiet_config(), 5).unwrap();

    assert!(f.resize(vp(1000.0, 1000.0), 3.0).is_err());
    assert_eq!(f.viewport(), vp(320.0, 240.0));
    assert_eq!(f.device_pixel_ratio(), 2.0);
    assert_eq!(
        f.surface().pixel_size(),
        Some(PixelSize {
            width: 640,
            height: 480
        })
    );
    assert_eq!(f.surface().transform(), Affine::scale(2.0));

    // Wrapping still uses the old bounds.
    f.tick().unwrap();
    for s in f.stars() {
        assert!(in_bounds(s.pos, vp(320.0, 240.0), f.config().star_margin));
    }
}
