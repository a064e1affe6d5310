// Tunable constants for the particle field. Defaults match the portfolio theme,
// and a page can override any subset of them with a JSON object.

use crate::color::Color;
use crate::error::FieldError;
use serde::Deserialize;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FieldConfig {
    /// Viewports narrower than this many logical pixels count as small screens.
    pub small_screen_width: u32,
    /// Surface area per particle on small screens.
    pub narrow_divisor: u32,
    /// Surface area per particle everywhere else.
    pub wide_divisor: u32,
    /// Particles closer than this are linked by a line.
    pub link_distance: f64,
    /// Opacity of a link between two particles at the same position.
    pub link_opacity: f64,
    pub link_width: f64,
    pub accent: Color,
}

impl Default for FieldConfig {
    fn default() -> Self {
        FieldConfig {
            small_screen_width: 768,
            narrow_divisor: 30_000,
            wide_divisor: 15_000,
            link_distance: 120.0,
            link_opacity: 0.15,
            link_width: 1.0,
            accent: Color::ACCENT,
        }
    }
}

impl FieldConfig {
    pub fn from_json(json: &str) -> Result<FieldConfig, FieldError> {
        let config: FieldConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), FieldError> {
        if self.narrow_divisor == 0 || self.wide_divisor == 0 {
            return Err(FieldError::InvalidConfig(
                "particle divisors must be non-zero".to_owned(),
            ));
        }
        if !self.link_distance.is_finite() || self.link_distance <= 0.0 {
            return Err(FieldError::InvalidConfig(format!(
                "link_distance must be positive, got {}",
                self.link_distance
            )));
        }
        if !(0.0..=1.0).contains(&self.link_opacity) {
            return Err(FieldError::InvalidConfig(format!(
                "link_opacity must be within [0, 1], got {}",
                self.link_opacity
            )));
        }
        if !self.link_width.is_finite() || self.link_width <= 0.0 {
            return Err(FieldError::InvalidConfig(format!(
                "link_width must be positive, got {}",
                self.link_width
            )));
        }
        Ok(())
    }

    pub fn is_small_screen(&self, width: u32) -> bool {
        width < self.small_screen_width
    }

    pub fn divisor_for_width(&self, width: u32) -> u32 {
        if self.is_small_screen(width) {
            self.narrow_divisor
        } else {
            self.wide_divisor
        }
    }

    pub fn particle_count(&self, width: u32, height: u32) -> usize {
        let area = u64::from(width) * u64::from(height);
        (area / u64::from(self.divisor_for_width(width))) as usize
    }
}
