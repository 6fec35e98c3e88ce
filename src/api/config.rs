use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::Viewport;
use crate::error::{DeckError, DeckResult};

use super::validation::validate_config;

fn default_frame_interval_micros() -> u64 {
    16_667
}

fn default_resize_debounce_ms() -> u64 {
    250
}

fn default_visibility_threshold() -> f64 {
    0.5
}

fn default_input_cooldown_ms() -> u64 {
    1_000
}

fn default_particle_seed() -> u64 {
    0x5EED_DECC
}

/// Runtime knobs of a [`super::Deck`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeckConfig {
    #[serde(default)]
    pub viewport: Viewport,
    /// Spacing of animation frames on the virtual clock (~60 Hz by default).
    #[serde(default = "default_frame_interval_micros")]
    pub frame_interval_micros: u64,
    #[serde(default = "default_resize_debounce_ms")]
    pub resize_debounce_ms: u64,
    /// Intersection ratio at which a page counts as in view, unless the page
    /// overrides it.
    #[serde(default = "default_visibility_threshold")]
    pub visibility_threshold: f64,
    /// Cooldown after a scene transition during which further input is swallowed.
    #[serde(default = "default_input_cooldown_ms")]
    pub input_cooldown_ms: u64,
    /// Seed for synthesized particle effects, so bursts are reproducible.
    #[serde(default = "default_particle_seed")]
    pub particle_seed: u64,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self::new(Viewport::default())
    }
}

impl DeckConfig {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            frame_interval_micros: default_frame_interval_micros(),
            resize_debounce_ms: default_resize_debounce_ms(),
            visibility_threshold: default_visibility_threshold(),
            input_cooldown_ms: default_input_cooldown_ms(),
            particle_seed: default_particle_seed(),
        }
    }

    #[must_use]
    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    #[must_use]
    pub fn with_frame_interval_micros(mut self, micros: u64) -> Self {
        self.frame_interval_micros = micros;
        self
    }

    #[must_use]
    pub fn with_resize_debounce_ms(mut self, millis: u64) -> Self {
        self.resize_debounce_ms = millis;
        self
    }

    #[must_use]
    pub fn with_visibility_threshold(mut self, threshold: f64) -> Self {
        self.visibility_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_input_cooldown_ms(mut self, millis: u64) -> Self {
        self.input_cooldown_ms = millis;
        self
    }

    #[must_use]
    pub fn with_particle_seed(mut self, seed: u64) -> Self {
        self.particle_seed = seed;
        self
    }

    #[must_use]
    pub fn frame_interval(&self) -> Duration {
        Duration::from_micros(self.frame_interval_micros)
    }

    #[must_use]
    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }

    #[must_use]
    pub fn input_cooldown(&self) -> Duration {
        Duration::from_millis(self.input_cooldown_ms)
    }

    pub fn validate(&self) -> DeckResult<()> {
        validate_config(self)
    }

    /// Parses and validates a config; absent fields take their defaults.
    pub fn from_json_str(input: &str) -> DeckResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|e| DeckError::InvalidConfig(format!("failed to parse deck config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> DeckResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| DeckError::InvalidConfig(format!("failed to serialize deck config: {e}")))
    }
}
