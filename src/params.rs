use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
/// Named per-channel grading preset applied as a fixed transform.
pub enum ColorCurve {
    #[default]
    Neutral,
    WarmVintage,
    CoolBlue,
    FadedPink,
    GreenTint,
    Sepia,
    BlackAndWhite,
    ViralOrange,
    SoftPeach,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
/// Visual treatment for the date stamp overlay.
pub enum DateStampStyle {
    #[default]
    Vintage,
    Compact,
    Polaroid,
    Modern,
    Custom,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// One filter's complete visual recipe.
///
/// Values are stored as-is; every stage clamps to its documented range at
/// use time, so out-of-range values behave as the nearest boundary and are
/// never an error. The default value is the fully neutral recipe: rendering
/// with it reproduces the source image exactly.
pub struct FilterParameters {
    // Film grain & texture
    pub grain_intensity: f32, // 0..1
    pub grain_size: f32,      // 0..1

    // Tone
    pub temperature: f32, // -1..1, cool to warm
    pub tint: f32,        // -1..1, green to magenta
    pub saturation: f32,  // 0..2
    pub contrast: f32,    // 0..2
    pub exposure: f32,    // -2..2, EV
    pub highlights: f32,  // -1..1
    pub shadows: f32,     // -1..1

    // Film-specific optics
    pub vignette: f32,             // 0..1
    pub light_leak_intensity: f32, // 0..1
    pub light_leak_color: String,  // "#RRGGBB"
    pub fade_amount: f32,          // 0..1
    pub halation: f32,             // 0..1

    // Compact digital camera artifacts
    pub digital_noise: f32, // 0..1
    pub sharpness: f32,     // 0..2, neutral at 1

    // Overlay
    pub date_stamp_enabled: bool,
    pub date_stamp_style: DateStampStyle,

    // Grading
    pub color_curve: ColorCurve,
}

impl Default for FilterParameters {
    fn default() -> Self {
        Self {
            grain_intensity: 0.0,
            grain_size: 0.0,
            temperature: 0.0,
            tint: 0.0,
            saturation: 1.0,
            contrast: 1.0,
            exposure: 0.0,
            highlights: 0.0,
            shadows: 0.0,
            vignette: 0.0,
            light_leak_intensity: 0.0,
            light_leak_color: "#FFFFFF".to_string(),
            fade_amount: 0.0,
            halation: 0.0,
            digital_noise: 0.0,
            sharpness: 1.0,
            date_stamp_enabled: false,
            date_stamp_style: DateStampStyle::Vintage,
            color_curve: ColorCurve::Neutral,
        }
    }
}

impl FilterParameters {
    /// Loads a recipe from a JSON file, if present and valid.
    pub fn load(path: &Path) -> Option<Self> {
        let json = std::fs::read_to_string(path).ok()?;
        serde_json::from_str(&json).ok()
    }

    /// Writes the recipe to a JSON file.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
