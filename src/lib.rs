//! Two-player top-down arena shooter.
//!
//! The library is the simulation: pure data in [`entities`], rules in
//! [`actor`] and [`compute`], and a display-free description of each frame in
//! [`render`].  The binary owns the terminal and the frame clock.

pub mod actor;
pub mod assets;
pub mod compute;
pub mod config;
pub mod entities;
pub mod geometry;
pub mod render;
