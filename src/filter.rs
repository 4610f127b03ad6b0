use serde::{Deserialize, Serialize};

use crate::params::{ColorCurve, DateStampStyle, FilterParameters};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Catalog metadata tag attached to a filter.
pub enum FilterTag {
    Trending,
    Popular,
    New,
    Free,
    Premium,
    Film,
    Digital,
    Vintage,
    Modern,
    Soft,
    Vibrant,
    Dark,
    Light,
    Kpop,
    Aesthetic,
    Y2k,
    Cinematic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// A named filter: display metadata plus one embedded recipe.
///
/// Metadata is fixed at construction. The pipeline only ever reads a
/// filter; derived variants (for live-preview adjustment) are produced by
/// replacing the recipe wholesale via [`Filter::with_parameters`].
/// Price/premium metadata is informational and not enforced here.
pub struct Filter {
    pub name: String,
    pub description: String,
    pub creator: Option<String>,
    pub price: f64,
    pub is_premium: bool,
    pub rating: f32,
    pub tags: Vec<FilterTag>,
    pub parameters: FilterParameters,
}

impl Filter {
    pub fn new(name: &str, description: &str, parameters: FilterParameters) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            creator: None,
            price: 0.0,
            is_premium: false,
            rating: 5.0,
            tags: Vec::new(),
            parameters,
        }
    }

    fn tagged(mut self, tags: &[FilterTag]) -> Self {
        self.tags = tags.to_vec();
        self
    }

    fn premium(mut self) -> Self {
        self.is_premium = true;
        self
    }

    /// Returns a copy of this filter with the recipe replaced wholesale.
    pub fn with_parameters(&self, parameters: FilterParameters) -> Self {
        let mut derived = self.clone();
        derived.parameters = parameters;
        derived
    }
}

/// Looks up a built-in filter by name, case-insensitively.
pub fn preset(name: &str) -> Option<Filter> {
    presets().into_iter().find(|f| f.name.eq_ignore_ascii_case(name))
}

/// The built-in filter catalog.
pub fn presets() -> Vec<Filter> {
    use FilterTag::*;

    vec![
        Filter::new(
            "Film Dreams",
            "Soft vintage film with warm tones",
            FilterParameters {
                grain_intensity: 0.25,
                grain_size: 0.5,
                temperature: 0.15,
                tint: 0.05,
                saturation: 0.95,
                contrast: 1.1,
                exposure: 0.08,
                highlights: -0.1,
                shadows: 0.1,
                vignette: 0.2,
                light_leak_intensity: 0.15,
                light_leak_color: "#FFD700".to_string(),
                fade_amount: 0.15,
                digital_noise: 0.0,
                sharpness: 0.9,
                date_stamp_enabled: false,
                date_stamp_style: DateStampStyle::Vintage,
                color_curve: ColorCurve::WarmVintage,
                halation: 0.2,
            },
        )
        .tagged(&[Trending, Free, Film, Soft]),
        Filter::new(
            "K-Pop Glow",
            "Soft, glowing skin like K-pop idols",
            FilterParameters {
                grain_intensity: 0.08,
                grain_size: 0.3,
                temperature: 0.12,
                tint: -0.03,
                saturation: 1.05,
                contrast: 1.03,
                exposure: 0.15,
                highlights: 0.08,
                shadows: 0.04,
                vignette: 0.08,
                light_leak_intensity: 0.12,
                light_leak_color: "#FFE5E5".to_string(),
                fade_amount: 0.03,
                digital_noise: 0.0,
                sharpness: 0.85,
                date_stamp_enabled: false,
                date_stamp_style: DateStampStyle::Modern,
                color_curve: ColorCurve::SoftPeach,
                halation: 0.25,
            },
        )
        .tagged(&[Trending, Popular, Kpop, Soft]),
        Filter::new(
            "Disposable",
            "Y2K disposable camera vibes",
            FilterParameters {
                grain_intensity: 0.35,
                grain_size: 0.6,
                temperature: 0.05,
                tint: 0.0,
                saturation: 1.15,
                contrast: 1.2,
                exposure: 0.1,
                highlights: -0.15,
                shadows: 0.12,
                vignette: 0.25,
                light_leak_intensity: 0.2,
                light_leak_color: "#FF6B35".to_string(),
                fade_amount: 0.1,
                digital_noise: 0.15,
                sharpness: 1.1,
                date_stamp_enabled: false,
                date_stamp_style: DateStampStyle::Compact,
                color_curve: ColorCurve::ViralOrange,
                halation: 0.18,
            },
        )
        .tagged(&[Trending, Y2k, Film, Vibrant]),
        Filter::new(
            "Y2K Digital",
            "Early 2000s digital camera aesthetic",
            FilterParameters {
                grain_intensity: 0.05,
                grain_size: 0.3,
                temperature: -0.08,
                tint: 0.0,
                saturation: 1.12,
                contrast: 1.15,
                exposure: 0.08,
                highlights: -0.08,
                shadows: 0.08,
                vignette: 0.12,
                light_leak_intensity: 0.0,
                light_leak_color: "#FFFFFF".to_string(),
                fade_amount: 0.0,
                digital_noise: 0.22,
                sharpness: 1.3,
                date_stamp_enabled: false,
                date_stamp_style: DateStampStyle::Compact,
                color_curve: ColorCurve::Neutral,
                halation: 0.08,
            },
        )
        .tagged(&[Popular, Digital, Y2k, Vibrant]),
        Filter::new(
            "Soft Aesthetic",
            "Instagram-ready soft dreamy look",
            FilterParameters {
                grain_intensity: 0.12,
                grain_size: 0.4,
                temperature: 0.18,
                tint: 0.04,
                saturation: 0.9,
                contrast: 0.98,
                exposure: 0.18,
                highlights: 0.1,
                shadows: 0.15,
                vignette: 0.15,
                light_leak_intensity: 0.18,
                light_leak_color: "#FFF0E5".to_string(),
                fade_amount: 0.22,
                digital_noise: 0.0,
                sharpness: 0.8,
                date_stamp_enabled: false,
                date_stamp_style: DateStampStyle::Modern,
                color_curve: ColorCurve::FadedPink,
                halation: 0.28,
            },
        )
        .tagged(&[Trending, Aesthetic, Soft, Light]),
        Filter::new(
            "Cinematic",
            "Movie-like color grading",
            FilterParameters {
                grain_intensity: 0.28,
                grain_size: 0.5,
                temperature: 0.08,
                tint: -0.08,
                saturation: 1.05,
                contrast: 1.22,
                exposure: -0.02,
                highlights: -0.18,
                shadows: 0.12,
                vignette: 0.3,
                light_leak_intensity: 0.08,
                light_leak_color: "#4A90E2".to_string(),
                fade_amount: 0.08,
                digital_noise: 0.04,
                sharpness: 1.1,
                date_stamp_enabled: false,
                date_stamp_style: DateStampStyle::Modern,
                color_curve: ColorCurve::CoolBlue,
                halation: 0.15,
            },
        )
        .tagged(&[Premium, Film, Cinematic, Dark])
        .premium(),
        Filter::new("Natural", "No filter, original look", FilterParameters::default())
            .tagged(&[Free]),
        Filter::new(
            "B&W Film",
            "Classic black and white film",
            FilterParameters {
                grain_intensity: 0.3,
                grain_size: 0.5,
                temperature: 0.0,
                tint: 0.0,
                saturation: 1.0,
                contrast: 1.15,
                exposure: 0.05,
                highlights: -0.1,
                shadows: 0.1,
                vignette: 0.25,
                light_leak_intensity: 0.0,
                light_leak_color: "#FFFFFF".to_string(),
                fade_amount: 0.1,
                digital_noise: 0.0,
                sharpness: 1.05,
                date_stamp_enabled: false,
                date_stamp_style: DateStampStyle::Vintage,
                color_curve: ColorCurve::BlackAndWhite,
                halation: 0.15,
            },
        )
        .tagged(&[Free, Film, Vintage]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_eight_presets() {
        assert_eq!(presets().len(), 8);
    }

    #[test]
    fn preset_lookup_is_case_insensitive() {
        assert!(preset("natural").is_some());
        assert!(preset("B&W FILM").is_some());
        assert!(preset("no such filter").is_none());
    }

    #[test]
    fn only_cinematic_is_premium() {
        let premium: Vec<String> = presets()
            .into_iter()
            .filter(|f| f.is_premium)
            .map(|f| f.name)
            .collect();
        assert_eq!(premium, vec!["Cinematic".to_string()]);
    }

    #[test]
    fn natural_preset_carries_the_neutral_recipe() {
        let natural = preset("Natural").unwrap();
        assert_eq!(natural.parameters, FilterParameters::default());
    }

    #[test]
    fn with_parameters_keeps_metadata_and_swaps_recipe() {
        let base = preset("Film Dreams").unwrap();
        let derived = base.with_parameters(FilterParameters::default());
        assert_eq!(derived.name, base.name);
        assert_eq!(derived.tags, base.tags);
        assert_eq!(derived.parameters, FilterParameters::default());
        assert_ne!(base.parameters, derived.parameters);
    }
}
