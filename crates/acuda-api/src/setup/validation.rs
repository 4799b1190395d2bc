//! Configuration validation
//!
//! Runs before anything else is initialized so a misconfigured process never starts serving.

use acuda_core::Config;
use anyhow::Result;

/// Validate the configuration, on top of the checks done while loading it.
pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;

    if config.is_production() {
        if config.cors_origins().iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS configured to allow all origins (*) in production. \
                Set explicit origins via CORS_ORIGINS."
            ));
        }
        if config.docx_escape_values() {
            tracing::info!("Word values are XML-escaped");
        } else {
            tracing::warn!(
                "DOCX_ESCAPE_VALUES is off in production; Word placeholder values are inserted unescaped"
            );
        }
    }

    if config.max_images() > 50 {
        tracing::warn!(
            max_images = config.max_images(),
            "MAX_IMAGES is high; every image is held in memory while a document renders"
        );
    }

    Ok(())
}
