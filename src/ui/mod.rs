//! Terminal rendering.
//!
//! Each view module exposes a `render` function taking the frame, the app
//! state, and the area to draw into. [`common`] holds the chrome shared by
//! every view; [`theme`] the color palette.

pub mod chart;
pub mod common;
pub mod detail;
pub mod sites;
pub mod theme;

pub use theme::Theme;
