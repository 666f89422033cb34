//! Giterme engine crate.
//!
//! This crate owns the platform + GPU runtime pieces: a winit window loop, a
//! Direct3D 11 device behind a small backend trait, and a renderer that
//! draws one vertex list per frame.

pub mod core;
pub mod device;
pub mod input;
pub mod logging;
pub mod render;
pub mod window;
