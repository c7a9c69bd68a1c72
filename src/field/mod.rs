//! The animated star field: configuration, particle kinematics, the per-frame engine and its
//! host-driven lifecycle.
pub mod config;
pub mod engine;
pub mod mount;
pub mod particles;
