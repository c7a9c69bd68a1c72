//! Team roster records and their display grouping.
pub mod grouping;
pub mod model;
