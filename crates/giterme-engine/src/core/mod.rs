//! Core engine-facing contracts.
//!
//! This module defines the interface between the runtime (platform loop) and
//! the application. All per-window state reaches the application through an
//! explicit [`FrameCtx`]; nothing is kept in globals.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::FrameCtx;
