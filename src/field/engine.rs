use crate::{
    field::{
        config::FieldConfig,
        particles::{Meteor, Orb, Star},
    },
    foundation::{
        core::{Affine, Point, Rgba8, Viewport, sane_device_pixel_ratio},
        error::StardeckResult,
        rng::Rng64,
    },
    surface::{Blend, DrawSurface, GradientStop, Paint},
};

const METEOR_HEAD_RADIUS: f64 = 1.6;
const METEOR_TRAIL_WIDTH: f64 = 1.4;

/// A decorative star/orb/meteor field bound to one drawing surface.
///
/// The field owns its surface and all particle state. [`ParticleField::tick`] runs one complete
/// frame (update and draw); scheduling frames is the job of [`crate::MountedField`].
#[derive(Debug)]
pub struct ParticleField<S> {
    surface: S,
    cfg: FieldConfig,
    viewport: Viewport,
    device_pixel_ratio: f64,
    rng: Rng64,
    stars: Vec<Star>,
    orbs: Vec<Orb>,
    meteors: Vec<Meteor>,
    meteor_clock: u32,
    meteor_threshold: u32,
    frames: u64,
}

impl<S: DrawSurface> ParticleField<S> {
    #[tracing::instrument(skip(surface, cfg))]
    pub fn new(
        surface: S,
        viewport: Viewport,
        device_pixel_ratio: f64,
        cfg: FieldConfig,
        seed: u64,
    ) -> StardeckResult<Self> {
        let cfg = cfg.sanitized();
        let mut rng = Rng64::new(seed);

        let stars = (0..cfg.star_count)
            .map(|_| Star::spawn(&mut rng, viewport, &cfg))
            .collect();
        let orbs = (0..cfg.orb_count)
            .map(|i| Orb::spawn(&mut rng, viewport, &cfg, i))
            .collect();
        let meteor_threshold = next_meteor_threshold(&mut rng, &cfg);

        let mut field = Self {
            surface,
            cfg,
            viewport,
            device_pixel_ratio: sane_device_pixel_ratio(device_pixel_ratio),
            rng,
            stars,
            orbs,
            meteors: Vec::new(),
            meteor_clock: 0,
            meteor_threshold,
            frames: 0,
        };
        Self::apply_size(&mut field.surface, field.viewport, field.device_pixel_ratio)?;
        tracing::debug!(
            stars = field.stars.len(),
            orbs = field.orbs.len(),
            "particle field created"
        );
        Ok(field)
    }

    /// Re-fit the surface to a new viewport. Particles are left where they are and wrap against
    /// the new bounds on their next step.
    ///
    /// If the surface cannot take the new size the field keeps its previous viewport and ratio.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn resize(&mut self, viewport: Viewport, device_pixel_ratio: f64) -> StardeckResult<()> {
        let ratio = sane_device_pixel_ratio(device_pixel_ratio);
        Self::apply_size(&mut self.surface, viewport, ratio)?;
        self.viewport = viewport;
        self.device_pixel_ratio = ratio;
        Ok(())
    }

    fn apply_size(surface: &mut S, viewport: Viewport, ratio: f64) -> StardeckResult<()> {
        surface.resize(viewport.to_pixels(ratio))?;
        surface.set_css_size(viewport);
        surface.set_transform(Affine::scale(ratio));
        Ok(())
    }

    /// Run one frame: update every entity and draw it.
    pub fn tick(&mut self) -> StardeckResult<()> {
        self.draw_background();
        self.step_orbs();
        self.step_stars();
        self.maybe_spawn_meteor();
        self.meteors.retain(|m| !m.expired());
        self.step_meteors();

        self.frames += 1;
        self.surface.present()
    }

    fn draw_background(&mut self) {
        let theme = &self.cfg.theme;
        let bounds = self.viewport.rect();
        let gradient = Paint::Linear {
            start: Point::ZERO,
            end: Point::new(0.0, self.viewport.height),
            stops: vec![
                GradientStop::new(0.0, theme.background_top),
                GradientStop::new(1.0, theme.background_bottom),
            ],
        };
        self.surface.set_blend(Blend::Normal);
        self.surface.clear_rect(bounds);
        self.surface.fill_rect(bounds, &gradient);
    }

    fn step_orbs(&mut self) {
        self.surface.set_blend(Blend::Lighter);
        for orb in &mut self.orbs {
            orb.step(self.viewport, self.cfg.orb_margin);
            let paint = Paint::Radial {
                center: orb.pos,
                radius: orb.radius,
                stops: vec![
                    GradientStop::new(0.0, orb.color),
                    GradientStop::new(1.0, orb.color.transparent()),
                ],
            };
            self.surface.fill_circle(orb.pos, orb.radius, &paint);
        }
    }

    fn step_stars(&mut self) {
        let theme = &self.cfg.theme;
        for star in &mut self.stars {
            let sample = star.step(self.viewport, self.cfg.star_margin);

            // Glow goes down first so the core sits on top of it.
            self.surface.set_blend(Blend::Lighter);
            let glow = Paint::Radial {
                center: star.pos,
                radius: sample.glow_radius,
                stops: vec![
                    GradientStop::new(0.0, theme.star_core.with_alpha_mul(star.alpha)),
                    GradientStop::new(0.35, theme.star_accent.with_alpha_mul(star.alpha * 0.5)),
                    GradientStop::new(1.0, theme.star_accent.transparent()),
                ],
            };
            self.surface
                .fill_circle(star.pos, sample.glow_radius, &glow);

            self.surface.set_blend(Blend::Normal);
            let core = Paint::Solid(theme.star_core.with_alpha_mul(star.alpha));
            self.surface.fill_circle(star.pos, sample.radius, &core);
        }
    }

    fn maybe_spawn_meteor(&mut self) {
        self.meteor_clock = self.meteor_clock.saturating_add(1);
        if self.meteor_clock <= self.meteor_threshold {
            return;
        }
        let meteor = Meteor::spawn(&mut self.rng, self.viewport, &self.cfg);
        tracing::debug!(
            x = meteor.pos.x,
            y = meteor.pos.y,
            max_life = meteor.max_life,
            "meteor spawned"
        );
        self.meteors.push(meteor);
        self.meteor_clock = 0;
        self.meteor_threshold = next_meteor_threshold(&mut self.rng, &self.cfg);
    }

    fn step_meteors(&mut self) {
        if self.meteors.is_empty() {
            return;
        }
        let head_color = Rgba8::WHITE;
        let accent = self.cfg.theme.meteor_accent;
        self.surface.set_blend(Blend::Lighter);
        for meteor in &mut self.meteors {
            let tail = meteor.tail();
            let trail = Paint::Linear {
                start: meteor.pos,
                end: tail,
                stops: vec![
                    GradientStop::new(0.0, head_color),
                    GradientStop::new(1.0, accent.transparent()),
                ],
            };
            self.surface
                .stroke_line(meteor.pos, tail, METEOR_TRAIL_WIDTH, &trail);
            self.surface
                .fill_circle(meteor.pos, METEOR_HEAD_RADIUS, &Paint::Solid(head_color));
            meteor.step();
        }
        self.surface.set_blend(Blend::Normal);
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn orbs(&self) -> &[Orb] {
        &self.orbs
    }

    pub fn meteors(&self) -> &[Meteor] {
        &self.meteors
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn device_pixel_ratio(&self) -> f64 {
        self.device_pixel_ratio
    }

    pub fn config(&self) -> &FieldConfig {
        &self.cfg
    }

    /// Frames rendered so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Frames left before the next meteor spawns.
    pub fn frames_until_meteor(&self) -> u32 {
        self.meteor_threshold
            .saturating_add(1)
            .saturating_sub(self.meteor_clock)
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }
}

fn next_meteor_threshold(rng: &mut Rng64, cfg: &FieldConfig) -> u32 {
    let jitter = rng.range(0.0, f64::from(cfg.meteor_jitter) + 1.0).floor() as u32;
    cfg.meteor_interval.saturating_add(jitter.min(cfg.meteor_jitter))
}

#[cfg(test)]
#[path = "../../tests/unit/field/engine.rs"]
mod tests;
