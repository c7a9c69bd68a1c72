//! Animated star-field backgrounds and team-page grouping for a studio website.
//!
//! Two independent pieces live here:
//!
//! - [`ParticleField`]: twinkling stars, drifting colour orbs and occasional meteors drawn onto any
//!   [`DrawSurface`], driven frame by frame either directly or through a [`FrameHost`] via
//!   [`MountedField`].
//! - [`group_members`]: turns flat [`TeamMember`] records into ordered display sections.
#![forbid(unsafe_code)]

pub(crate) mod foundation;

pub mod field;
pub mod host;
pub mod surface;
pub mod team;

pub use field::{
    config::{FieldConfig, Theme, ThemePreset},
    engine::ParticleField,
    mount::MountedField,
    particles::{Meteor, Orb, Star, StarSample, wrap},
};
pub use foundation::{
    color::{parse_hex, to_hex},
    core::{
        Affine, PixelSize, Point, Rect, Rgba8, Vec2, Viewport, sane_device_pixel_ratio,
    },
    error::{StardeckError, StardeckResult},
    rng::Rng64,
};
pub use host::{
    FrameCallback, FrameHandle, FrameHost, ResizeCallback, ResizeSubscription, manual::ManualHost,
};
pub use surface::{
    Blend, DrawSurface, GradientStop, Paint,
    cpu::{CpuSurface, FrameRgba},
    recording::{DrawCmd, RecordingSurface},
};
pub use team::{
    grouping::{RoleGroup, RoleSubgroup, UNASSIGNED_GROUP, UNASSIGNED_LABEL, group_members},
    model::{ImageFraming, RoleMetadata, SocialLink, TeamMember, TeamRoster, rank_from_value},
};
