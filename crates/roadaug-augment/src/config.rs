use serde::{Deserialize, Serialize};

use crate::{error::AugmentError, noise_blur::ToneTransform};

fn check_prob(name: &str, p: f64) -> Result<(), AugmentError> {
    if !(0.0..=1.0).contains(&p) {
        return Err(AugmentError::InvalidConfig(format!(
            "{name} must be a probability in [0, 1], got {p}"
        )));
    }
    Ok(())
}

fn check_range<T: PartialOrd + std::fmt::Debug>(
    name: &str,
    range: &(T, T),
) -> Result<(), AugmentError> {
    // also rejects NaN bounds
    if !(range.0 <= range.1) {
        return Err(AugmentError::InvalidConfig(format!(
            "{name} must be an ordered range, got {range:?}"
        )));
    }
    Ok(())
}

/// Parameters of the noise and blur stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseBlurConfig {
    /// Probability of applying one tone transform, when any are configured.
    pub tone_prob: f64,
    /// Candidate tone transforms. Empty disables the tone family.
    pub tone_transforms: Vec<ToneTransform>,
    /// Probability of applying one noise transform.
    pub noise_prob: f64,
    /// Probability of applying one blur transform.
    pub blur_prob: f64,
    /// Largest blur kernel size; kernel sizes are odd values in `[3, blur_limit]`.
    pub blur_limit: usize,
    /// Range of the per-pixel gaussian noise standard deviation, in 8-bit units.
    pub gaussian_sigma: (f32, f32),
    /// Range of the per-channel gaussian noise variance, in squared 8-bit units.
    pub gaussian_var: (f32, f32),
    /// Range of the ISO noise hue shift, as a fraction of the hue circle.
    pub iso_color_shift: (f32, f32),
    /// Range of the ISO noise intensity.
    pub iso_intensity: (f32, f32),
}

impl Default for NoiseBlurConfig {
    fn default() -> Self {
        Self {
            tone_prob: 0.3,
            tone_transforms: Vec::new(),
            noise_prob: 0.2,
            blur_prob: 0.2,
            blur_limit: 7,
            gaussian_sigma: (0.01 * 255.0, 0.05 * 255.0),
            gaussian_var: (10.0, 50.0),
            iso_color_shift: (0.01, 0.05),
            iso_intensity: (0.1, 0.5),
        }
    }
}

impl NoiseBlurConfig {
    /// Check that every probability and range is valid.
    pub fn validate(&self) -> Result<(), AugmentError> {
        check_prob("noise_blur.tone_prob", self.tone_prob)?;
        check_prob("noise_blur.noise_prob", self.noise_prob)?;
        check_prob("noise_blur.blur_prob", self.blur_prob)?;
        if self.blur_limit < 3 {
            return Err(AugmentError::InvalidConfig(format!(
                "noise_blur.blur_limit must be at least 3, got {}",
                self.blur_limit
            )));
        }
        check_range("noise_blur.gaussian_sigma", &self.gaussian_sigma)?;
        check_range("noise_blur.gaussian_var", &self.gaussian_var)?;
        check_range("noise_blur.iso_color_shift", &self.iso_color_shift)?;
        check_range("noise_blur.iso_intensity", &self.iso_intensity)?;
        if self.gaussian_sigma.0 < 0.0 || self.gaussian_var.0 < 0.0 {
            return Err(AugmentError::InvalidConfig(
                "noise_blur gaussian ranges must be non-negative".to_string(),
            ));
        }
        if self.iso_color_shift.0 < 0.0 || self.iso_intensity.0 < 0.0 {
            return Err(AugmentError::InvalidConfig(
                "noise_blur iso ranges must be non-negative".to_string(),
            ));
        }
        for tone in &self.tone_transforms {
            tone.validate()?;
        }
        Ok(())
    }
}

/// Ranges of the enhancement factors, 1.0 being neutral.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhotometricConfig {
    /// Brightness factor range.
    pub brightness: (f32, f32),
    /// Contrast factor range.
    pub contrast: (f32, f32),
    /// Sharpness factor range.
    pub sharpness: (f32, f32),
    /// Color saturation factor range.
    pub color: (f32, f32),
}

impl Default for PhotometricConfig {
    fn default() -> Self {
        Self {
            brightness: (0.5, 2.0),
            contrast: (0.5, 1.0),
            sharpness: (0.5, 1.5),
            color: (0.0, 2.0),
        }
    }
}

impl PhotometricConfig {
    /// Check that every range is ordered.
    pub fn validate(&self) -> Result<(), AugmentError> {
        check_range("photometric.brightness", &self.brightness)?;
        check_range("photometric.contrast", &self.contrast)?;
        check_range("photometric.sharpness", &self.sharpness)?;
        check_range("photometric.color", &self.color)
    }
}

/// Parameters of the shadow compositor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadowConfig {
    /// Rotation range in whole degrees, inclusive.
    pub rotation: (i32, i32),
    /// Range of the factor applied to the mask opacity.
    pub opacity: (f32, f32),
    /// Range of both offset coordinates in pixels, inclusive.
    pub offset: (i64, i64),
}

impl Default for ShadowConfig {
    fn default() -> Self {
        Self {
            rotation: (-35, 35),
            opacity: (0.3, 1.0),
            offset: (-128, 128),
        }
    }
}

impl ShadowConfig {
    /// Check that every range is ordered.
    pub fn validate(&self) -> Result<(), AugmentError> {
        check_range("shadow.rotation", &self.rotation)?;
        check_range("shadow.opacity", &self.opacity)?;
        check_range("shadow.offset", &self.offset)
    }
}

/// Parameters of the perspective sampler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerspectiveConfig {
    /// Side of the square the source quad is defined on.
    pub reference_size: f64,
    /// Range of the bottom edge width, relative to the image width.
    pub width_scale: (f64, f64),
    /// Range of the bottom edge shift, relative to the image width.
    pub shift: (f64, f64),
    /// Smallest allowed bottom edge width in pixels.
    pub min_width: i64,
}

impl Default for PerspectiveConfig {
    fn default() -> Self {
        Self {
            reference_size: 256.0,
            width_scale: (0.9, 1.1),
            shift: (-0.2, 0.2),
            min_width: 1,
        }
    }
}

impl PerspectiveConfig {
    /// Check that the reference square and ranges are valid.
    pub fn validate(&self) -> Result<(), AugmentError> {
        if !(self.reference_size > 0.0) || !self.reference_size.is_finite() {
            return Err(AugmentError::InvalidConfig(format!(
                "perspective.reference_size must be positive, got {}",
                self.reference_size
            )));
        }
        if self.min_width < 1 {
            return Err(AugmentError::InvalidConfig(format!(
                "perspective.min_width must be at least 1, got {}",
                self.min_width
            )));
        }
        check_range("perspective.width_scale", &self.width_scale)?;
        check_range("perspective.shift", &self.shift)
    }
}

/// Configuration of the whole augmentation pipeline.
///
/// Missing fields take their default values when deserialized:
///
/// ```
/// use roadaug_augment::AugmentConfig;
///
/// let config = AugmentConfig::from_json_str(r#"{ "noise_blur": { "blur_prob": 0.5 } }"#).unwrap();
/// assert_eq!(config.noise_blur.blur_prob, 0.5);
/// assert_eq!(config.noise_blur.noise_prob, 0.2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AugmentConfig {
    /// Noise and blur stage.
    pub noise_blur: NoiseBlurConfig,
    /// Enhancement chain.
    pub photometric: PhotometricConfig,
    /// Shadow compositor.
    pub shadow: ShadowConfig,
    /// Perspective sampler.
    pub perspective: PerspectiveConfig,
}

impl AugmentConfig {
    /// Parse and validate a configuration from JSON.
    pub fn from_json_str(json: &str) -> Result<Self, AugmentError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every stage configuration.
    pub fn validate(&self) -> Result<(), AugmentError> {
        self.noise_blur.validate()?;
        self.photometric.validate()?;
        self.shadow.validate()?;
        self.perspective.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::AugmentConfig;
    use crate::{error::AugmentError, noise_blur::ToneTransform};

    #[test]
    fn default_is_valid() -> Result<(), AugmentError> {
        AugmentConfig::default().validate()
    }

    #[test]
    fn json_roundtrip() -> Result<(), AugmentError> {
        let mut config = AugmentConfig::default();
        config.noise_blur.tone_transforms = vec![
            ToneTransform::Invert,
            ToneTransform::RgbShift { shift_limit: 10 },
        ];
        let json = serde_json::to_string(&config)?;
        assert_eq!(AugmentConfig::from_json_str(&json)?, config);
        Ok(())
    }

    #[test]
    fn invalid_values_are_rejected() {
        let cases = [
            r#"{ "noise_blur": { "noise_prob": 1.5 } }"#,
            r#"{ "noise_blur": { "blur_limit": 1 } }"#,
            r#"{ "photometric": { "brightness": [2.0, 0.5] } }"#,
            r#"{ "perspective": { "reference_size": 0.0 } }"#,
            r#"{ "perspective": { "min_width": 0 } }"#,
            r#"{ "shadow": { "offset": [10, -10] } }"#,
        ];
        for json in cases {
            assert!(
                matches!(
                    AugmentConfig::from_json_str(json),
                    Err(AugmentError::InvalidConfig(_))
                ),
                "{json}"
            );
        }
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            AugmentConfig::from_json_str("{ not json"),
            Err(AugmentError::ConfigParse(_))
        ));
    }
}
