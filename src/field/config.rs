use crate::foundation::core::Rgba8;

/// Colour palette for one particle field.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Theme {
    pub background_top: Rgba8,
    pub background_bottom: Rgba8,
    /// Near-white used for star cores and the hot centre of glows.
    pub star_core: Rgba8,
    /// Tint that star glows fade through before going transparent.
    pub star_accent: Rgba8,
    /// Tint meteor trails fade to.
    pub meteor_accent: Rgba8,
    /// Orb colours, assigned round-robin.
    pub orb_colors: Vec<Rgba8>,
}

impl Default for Theme {
    fn default() -> Self {
        ThemePreset::Home.theme()
    }
}

/// Built-in palettes, one per site page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemePreset {
    #[default]
    Home,
    About,
    Services,
    Projects,
    Blog,
    Team,
    Progress,
    Verify,
    Contact,
    Schedule,
    Legal,
}

impl ThemePreset {
    pub const ALL: [ThemePreset; 11] = [
        Self::Home,
        Self::About,
        Self::Services,
        Self::Projects,
        Self::Blog,
        Self::Team,
        Self::Progress,
        Self::Verify,
        Self::Contact,
        Self::Schedule,
        Self::Legal,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::About => "about",
            Self::Services => "services",
            Self::Projects => "projects",
            Self::Blog => "blog",
            Self::Team => "team",
            Self::Progress => "progress",
            Self::Verify => "verify",
            Self::Contact => "contact",
            Self::Schedule => "schedule",
            Self::Legal => "legal",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(name))
    }

    pub fn theme(self) -> Theme {
        let core = Rgba8::rgb(248, 250, 255);
        let (top, bottom, accent, meteor, orbs): (Rgba8, Rgba8, Rgba8, Rgba8, Vec<Rgba8>) =
            match self {
                Self::Home => (
                    Rgba8::rgb(5, 8, 22),
                    Rgba8::rgb(17, 12, 46),
                    Rgba8::rgb(129, 140, 248),
                    Rgba8::rgb(165, 180, 252),
                    vec![
                        Rgba8::rgba(99, 102, 241, 46),
                        Rgba8::rgba(168, 85, 247, 38),
                        Rgba8::rgba(56, 189, 248, 31),
                    ],
                ),
                Self::About | Self::Team => (
                    Rgba8::rgb(3, 7, 18),
                    Rgba8::rgb(12, 24, 48),
                    Rgba8::rgb(96, 165, 250),
                    Rgba8::rgb(147, 197, 253),
                    vec![
                        Rgba8::rgba(59, 130, 246, 41),
                        Rgba8::rgba(14, 165, 233, 33),
                    ],
                ),
                Self::Services | Self::Projects => (
                    Rgba8::rgb(8, 6, 20),
                    Rgba8::rgb(30, 10, 40),
                    Rgba8::rgb(192, 132, 252),
                    Rgba8::rgb(233, 213, 255),
                    vec![
                        Rgba8::rgba(147, 51, 234, 41),
                        Rgba8::rgba(236, 72, 153, 31),
                        Rgba8::rgba(99, 102, 241, 33),
                    ],
                ),
                Self::Blog | Self::Progress => (
                    Rgba8::rgb(2, 10, 14),
                    Rgba8::rgb(6, 30, 36),
                    Rgba8::rgb(45, 212, 191),
                    Rgba8::rgb(153, 246, 228),
                    vec![
                        Rgba8::rgba(20, 184, 166, 38),
                        Rgba8::rgba(34, 197, 94, 26),
                    ],
                ),
                Self::Verify | Self::Legal => (
                    Rgba8::rgb(6, 8, 14),
                    Rgba8::rgb(18, 22, 34),
                    Rgba8::rgb(148, 163, 184),
                    Rgba8::rgb(203, 213, 225),
                    vec![Rgba8::rgba(100, 116, 139, 31)],
                ),
                Self::Contact | Self::Schedule => (
                    Rgba8::rgb(14, 6, 10),
                    Rgba8::rgb(40, 12, 24),
                    Rgba8::rgb(251, 146, 60),
                    Rgba8::rgb(254, 215, 170),
                    vec![
                        Rgba8::rgba(249, 115, 22, 33),
                        Rgba8::rgba(244, 63, 94, 31),
                    ],
                ),
            };

        Theme {
            background_top: top,
            background_bottom: bottom,
            star_core: core,
            star_accent: accent,
            meteor_accent: meteor,
            orb_colors: orbs,
        }
    }
}

/// Population and timing parameters of a particle field.
///
/// All fields default, so partial JSON is accepted. Call [`FieldConfig::sanitized`] before use;
/// the engine does so itself.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    pub theme: Theme,
    pub star_count: usize,
    pub orb_count: usize,
    /// Out-of-bounds distance before a star wraps.
    pub star_margin: f64,
    /// Out-of-bounds distance before an orb wraps.
    pub orb_margin: f64,
    pub star_radius: [f64; 2],
    pub star_alpha: [f64; 2],
    pub twinkle_speed: [f64; 2],
    pub glow_strength: [f64; 2],
    /// Horizontal drift is drawn from `[-star_drift_x, star_drift_x)`.
    pub star_drift_x: f64,
    /// Downward drift range; both ends non-negative.
    pub star_drift_y: [f64; 2],
    pub orb_radius: [f64; 2],
    pub orb_speed: f64,
    /// Frames between meteors before jitter.
    pub meteor_interval: u32,
    /// Upper bound of random extra frames added to each interval.
    pub meteor_jitter: u32,
    pub meteor_speed: [f64; 2],
    pub meteor_trail: [f64; 2],
    pub meteor_life: [u32; 2],
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            star_count: 150,
            orb_count: 5,
            star_margin: 10.0,
            orb_margin: 150.0,
            star_radius: [0.3, 1.6],
            star_alpha: [0.35, 1.0],
            twinkle_speed: [0.01, 0.04],
            glow_strength: [3.0, 6.0],
            star_drift_x: 0.08,
            star_drift_y: [0.02, 0.12],
            orb_radius: [140.0, 280.0],
            orb_speed: 0.15,
            meteor_interval: 420,
            meteor_jitter: 360,
            meteor_speed: [7.0, 11.0],
            meteor_trail: [6.0, 10.0],
            meteor_life: [70, 110],
        }
    }
}

impl FieldConfig {
    pub fn with_preset(preset: ThemePreset) -> Self {
        Self {
            theme: preset.theme(),
            ..Self::default()
        }
    }

    /// Replace every unusable value with its default. Never fails.
    pub fn sanitized(self) -> Self {
        let d = Self::default();
        let mut out = self;

        if out.star_count == 0 {
            tracing::warn!("star_count is zero, using {}", d.star_count);
            out.star_count = d.star_count;
        }
        if out.orb_count == 0 {
            tracing::warn!("orb_count is zero, using {}", d.orb_count);
            out.orb_count = d.orb_count;
        }

        out.star_margin = positive_or("star_margin", out.star_margin, d.star_margin);
        out.orb_margin = positive_or("orb_margin", out.orb_margin, d.orb_margin);
        out.star_drift_x = non_negative_or("star_drift_x", out.star_drift_x, d.star_drift_x);
        out.orb_speed = non_negative_or("orb_speed", out.orb_speed, d.orb_speed);

        out.star_radius = range_or("star_radius", out.star_radius, d.star_radius, 0.0, None);
        out.star_alpha = range_or("star_alpha", out.star_alpha, d.star_alpha, 0.0, Some(1.0));
        out.twinkle_speed =
            range_or("twinkle_speed", out.twinkle_speed, d.twinkle_speed, 0.0, None);
        out.glow_strength =
            range_or("glow_strength", out.glow_strength, d.glow_strength, 0.0, None);
        out.star_drift_y = range_or("star_drift_y", out.star_drift_y, d.star_drift_y, 0.0, None);
        out.orb_radius = range_or("orb_radius", out.orb_radius, d.orb_radius, 0.0, None);
        out.meteor_speed = range_or("meteor_speed", out.meteor_speed, d.meteor_speed, 0.0, None);
        out.meteor_trail = range_or("meteor_trail", out.meteor_trail, d.meteor_trail, 0.0, None);

        if out.meteor_interval == 0 {
            tracing::warn!("meteor_interval is zero, using {}", d.meteor_interval);
            out.meteor_interval = d.meteor_interval;
        }
        let [lo, hi] = out.meteor_life;
        if lo == 0 || hi < lo {
            tracing::warn!(lo, hi, "meteor_life range unusable, using default");
            out.meteor_life = d.meteor_life;
        }
        if out.theme.orb_colors.is_empty() {
            out.theme.orb_colors = d.theme.orb_colors;
        }
        out
    }
}

fn positive_or(name: &str, v: f64, fallback: f64) -> f64 {
    if v.is_finite() && v > 0.0 {
        v
    } else {
        tracing::warn!(field = name, value = v, "non-positive value, using {fallback}");
        fallback
    }
}

fn non_negative_or(name: &str, v: f64, fallback: f64) -> f64 {
    if v.is_finite() && v >= 0.0 {
        v
    } else {
        tracing::warn!(field = name, value = v, "negative value, using {fallback}");
        fallback
    }
}

fn range_or(name: &str, r: [f64; 2], fallback: [f64; 2], min: f64, max: Option<f64>) -> [f64; 2] {
    let [lo, hi] = r;
    let in_bounds = |v: f64| v.is_finite() && v >= min && max.is_none_or(|m| v <= m);
    if in_bounds(lo) && in_bounds(hi) && lo <= hi {
        r
    } else {
        tracing::warn!(field = name, lo, hi, "range unusable, using {fallback:?}");
        fallback
    }
}

#[cfg(test)]
#[path = "../../tests/unit/field/config.rs"]
mod tests;
