//! Film camera and compact-digital aesthetic emulation for still images.
//!
//! One [`FilterParameters`] recipe describes a look (grain, color grading,
//! vignette, light leak, halation, fade, sensor noise, date stamp); the
//! pipeline in [`processing`] applies it to a decoded image in a fixed
//! stage order and returns a new RGBA buffer of the same size.

pub mod color;
pub mod filter;
pub mod params;
pub mod processing;

pub use filter::{preset, presets, Filter, FilterTag};
pub use params::{ColorCurve, DateStampStyle, FilterParameters};
pub use processing::stamp::StampDate;
pub use processing::{
    render, render_bytes, render_params, spawn_render, CancelToken, RenderError, RenderHandle,
    RenderOptions,
};
