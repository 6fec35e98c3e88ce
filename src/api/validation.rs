use crate::core::Viewport;
use crate::error::{DeckError, DeckResult};

use super::DeckConfig;

pub(super) fn validate_viewport(viewport: Viewport) -> DeckResult<()> {
    if !viewport.is_valid() {
        return Err(DeckError::InvalidViewport {
            width: viewport.width,
            height: viewport.height,
        });
    }
    Ok(())
}

pub(super) fn validate_visibility_threshold(threshold: f64) -> DeckResult<()> {
    if !threshold.is_finite() || !(0.0..=1.0).contains(&threshold) {
        return Err(DeckError::InvalidConfig(format!(
            "visibility threshold must be finite and in [0, 1], got {threshold}"
        )));
    }
    Ok(())
}

pub(super) fn validate_config(config: &DeckConfig) -> DeckResult<()> {
    validate_viewport(config.viewport).map_err(|err| {
        DeckError::InvalidConfig(format!("deck viewport rejected: {err}"))
    })?;
    if config.frame_interval_micros == 0 {
        return Err(DeckError::InvalidConfig(
            "frame interval must be greater than zero".to_owned(),
        ));
    }
    validate_visibility_threshold(config.visibility_threshold)?;
    Ok(())
}
