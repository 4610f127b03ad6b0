//! The rendering pipeline: fixed-order composition of the effect stages.

pub mod adjust;
pub mod curve;
pub mod optics;
pub mod sharpen;
pub mod stamp;
pub mod texture;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::time::{SystemTime, UNIX_EPOCH};

use image::{DynamicImage, RgbaImage};
use thiserror::Error;
use tracing::debug;

use crate::filter::Filter;
use crate::params::FilterParameters;
use self::stamp::StampDate;

/// Decorrelates the digital-noise field from the grain field when both are
/// derived from the same render seed.
const NOISE_SEED_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("source image could not be decoded")]
    InvalidImage(#[source] image::ImageError),
    #[error("rendering failed: {0}")]
    RenderingFailed(String),
    #[error("render was cancelled")]
    Cancelled,
}

/// Shared flag a caller can set to abandon an in-flight render. Checked
/// between stage boundaries, so a cancelled run never yields a partially
/// filtered buffer.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Seed for the grain/noise fields. `None` derives one from the clock.
    pub seed: Option<u64>,
    /// Date for the stamp overlay. `None` uses today's date.
    pub date: Option<StampDate>,
    pub cancel: CancelToken,
}

/// Renders one image through a filter with default options.
pub fn render(source: &DynamicImage, filter: &Filter) -> Result<RgbaImage, RenderError> {
    render_params(source, &filter.parameters, &RenderOptions::default())
}

/// Decodes an encoded image and renders it. Decode failure is the one hard
/// error surfaced to callers.
pub fn render_bytes(
    bytes: &[u8],
    params: &FilterParameters,
    opts: &RenderOptions,
) -> Result<RgbaImage, RenderError> {
    let source = image::load_from_memory(bytes).map_err(RenderError::InvalidImage)?;
    render_params(&source, params, opts)
}

/// Runs the full pipeline over one decoded image.
///
/// Stage order is fixed: color adjustment, color curve, sharpen, fade,
/// halation, vignette, light leak, grain, digital noise, date stamp.
/// Texture comes after the tonal and optical stages so noise is never
/// re-blurred or re-colored, and the stamp is always topmost. The source is
/// converted to RGBA once; every stage works on that same buffer
/// representation, and the output keeps the source dimensions.
pub fn render_params(
    source: &DynamicImage,
    params: &FilterParameters,
    opts: &RenderOptions,
) -> Result<RgbaImage, RenderError> {
    let (w, h) = (source.width(), source.height());
    debug!(width = w, height = h, curve = ?params.color_curve, "render start");

    let seed = opts.seed.unwrap_or_else(time_seed);
    let cancel = &opts.cancel;

    checkpoint(cancel)?;
    let mut img = source.to_rgba8();

    img = adjust::apply(img, params);
    checkpoint(cancel)?;

    img = curve::apply(img, params.color_curve);
    checkpoint(cancel)?;

    img = sharpen::apply(img, params.sharpness);
    checkpoint(cancel)?;

    img = optics::fade(img, params.fade_amount);
    checkpoint(cancel)?;

    img = optics::halation(img, params.halation);
    checkpoint(cancel)?;

    img = optics::vignette(img, params.vignette);
    checkpoint(cancel)?;

    img = optics::light_leak(img, params.light_leak_intensity, &params.light_leak_color);
    checkpoint(cancel)?;

    img = texture::grain(img, params.grain_intensity, params.grain_size, seed);
    checkpoint(cancel)?;

    img = texture::digital_noise(img, params.digital_noise, seed ^ NOISE_SEED_SALT);
    checkpoint(cancel)?;

    if params.date_stamp_enabled {
        let date = opts.date.unwrap_or_else(StampDate::today);
        img = stamp::apply(img, params.date_stamp_style, &date);
    }

    if img.dimensions() != (w, h) {
        return Err(RenderError::RenderingFailed(
            "a stage changed the image dimensions".to_string(),
        ));
    }

    debug!(width = w, height = h, "render done");
    Ok(img)
}

/// Handle to a render running on a background thread. Dropping the handle
/// detaches the render; call [`RenderHandle::cancel`] first to stop it.
pub struct RenderHandle {
    rx: mpsc::Receiver<Result<RgbaImage, RenderError>>,
    cancel: CancelToken,
}

impl RenderHandle {
    /// Requests cancellation; the worker stops at the next stage boundary.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Returns the result if the render has finished, without blocking.
    pub fn try_result(&self) -> Option<Result<RgbaImage, RenderError>> {
        self.rx.try_recv().ok()
    }

    /// Blocks until the render finishes.
    pub fn wait(self) -> Result<RgbaImage, RenderError> {
        self.rx
            .recv()
            .unwrap_or_else(|_| Err(RenderError::RenderingFailed("render worker exited".to_string())))
    }
}

/// Runs a render on a background thread so callers can evaluate several
/// filters concurrently, one render per image. Each render owns its working
/// buffer and its own seeded noise state, so concurrent calls stay
/// independent and reproducible.
pub fn spawn_render(
    source: DynamicImage,
    params: FilterParameters,
    opts: RenderOptions,
) -> RenderHandle {
    let cancel = opts.cancel.clone();
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let result = render_params(&source, &params, &opts);
        let _ = tx.send(result);
    });
    RenderHandle { rx, cancel }
}

fn checkpoint(cancel: &CancelToken) -> Result<(), RenderError> {
    if cancel.is_cancelled() {
        Err(RenderError::Cancelled)
    } else {
        Ok(())
    }
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0x5EED)
}
