use std::f64::consts::TAU;

use crate::{
    field::config::FieldConfig,
    foundation::{
        core::{Point, Rgba8, Vec2, Viewport},
        rng::Rng64,
    },
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Star {
    pub pos: Point,
    pub base_radius: f64,
    pub vel: Vec2,
    pub alpha: f64,
    pub twinkle_phase: f64,
    pub twinkle_speed: f64,
    pub glow_strength: f64,
}

/// Per-frame draw geometry of a star.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StarSample {
    pub twinkle: f64,
    pub radius: f64,
    pub glow_radius: f64,
}

impl Star {
    pub fn spawn(rng: &mut Rng64, viewport: Viewport, cfg: &FieldConfig) -> Self {
        Self {
            pos: Point::new(
                rng.range(0.0, viewport.width),
                rng.range(0.0, viewport.height),
            ),
            base_radius: rng.range(cfg.star_radius[0], cfg.star_radius[1]),
            vel: Vec2::new(
                rng.range(-cfg.star_drift_x, cfg.star_drift_x),
                rng.range(cfg.star_drift_y[0], cfg.star_drift_y[1]),
            ),
            alpha: rng.range(cfg.star_alpha[0], cfg.star_alpha[1]),
            twinkle_phase: rng.range(0.0, TAU),
            twinkle_speed: rng.range(cfg.twinkle_speed[0], cfg.twinkle_speed[1]),
            glow_strength: rng.range(cfg.glow_strength[0], cfg.glow_strength[1]),
        }
    }

    /// Advance twinkle phase and position by one frame, wrapping at `margin`.
    pub fn step(&mut self, viewport: Viewport, margin: f64) -> StarSample {
        self.twinkle_phase += self.twinkle_speed;
        let twinkle = 0.5 + 0.5 * self.twinkle_phase.sin();
        let radius = self.base_radius * (0.8 + twinkle * 1.5);
        let glow_radius = radius * self.glow_strength;

        self.pos += self.vel;
        self.pos = wrap(self.pos, viewport, margin);

        StarSample {
            twinkle,
            radius,
            glow_radius,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Orb {
    pub pos: Point,
    pub radius: f64,
    pub vel: Vec2,
    pub color: Rgba8,
}

impl Orb {
    pub fn spawn(rng: &mut Rng64, viewport: Viewport, cfg: &FieldConfig, index: usize) -> Self {
        let palette = &cfg.theme.orb_colors;
        let color = if palette.is_empty() {
            cfg.theme.star_accent.with_alpha_mul(0.15)
        } else {
            palette[index % palette.len()]
        };
        Self {
            pos: Point::new(
                rng.range(0.0, viewport.width),
                rng.range(0.0, viewport.height),
            ),
            radius: rng.range(cfg.orb_radius[0], cfg.orb_radius[1]),
            vel: Vec2::new(
                rng.range(-cfg.orb_speed, cfg.orb_speed),
                rng.range(-cfg.orb_speed, cfg.orb_speed),
            ),
            color,
        }
    }

    pub fn step(&mut self, viewport: Viewport, margin: f64) {
        self.pos += self.vel;
        self.pos = wrap(self.pos, viewport, margin);
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Meteor {
    pub pos: Point,
    pub vel: Vec2,
    /// Trail length as a multiple of the velocity vector.
    pub trail_len: f64,
    pub life: u32,
    pub max_life: u32,
}

impl Meteor {
    /// Spawn on the left or right edge (50/50), heading inward and slightly down.
    pub fn spawn(rng: &mut Rng64, viewport: Viewport, cfg: &FieldConfig) -> Self {
        let from_left = rng.coin();
        let y = rng.range(0.0, viewport.height);
        let speed = rng.range(cfg.meteor_speed[0], cfg.meteor_speed[1]);
        let dip = rng.range(0.15, 0.35);
        let vx = if from_left { speed } else { -speed };
        let [lo, hi] = cfg.meteor_life;
        let span = u64::from(hi.saturating_sub(lo)) + 1;
        let max_life = lo.saturating_add((rng.next_u64() % span) as u32);

        Self {
            pos: Point::new(if from_left { 0.0 } else { viewport.width }, y),
            vel: Vec2::new(vx, speed * dip),
            trail_len: rng.range(cfg.meteor_trail[0], cfg.meteor_trail[1]),
            life: 0,
            max_life,
        }
    }

    pub fn expired(&self) -> bool {
        self.life >= self.max_life
    }

    /// Far end of the trail, behind the head along the velocity.
    pub fn tail(&self) -> Point {
        self.pos - self.vel * self.trail_len
    }

    pub fn step(&mut self) {
        self.pos += self.vel;
        self.life = self.life.saturating_add(1);
    }
}

/// Toroidal wrap: leaving by more than `margin` on one side re-enters at the opposite side.
/// Each axis is handled independently.
pub fn wrap(p: Point, viewport: Viewport, margin: f64) -> Point {
    fn axis(v: f64, extent: f64, margin: f64) -> f64 {
        if v < -margin {
            extent + margin
        } else if v > extent + margin {
            -margin
        } else {
            v
        }
    }
    Point::new(
        axis(p.x, viewport.width, margin),
        axis(p.y, viewport.height, margin),
    )
}

#[cfg(test)]
#[path = "../../tests/unit/field/particles.rs"]
mod tests;
