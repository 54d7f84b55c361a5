//! Configuration for the cropper and the external services it hands off to.
//!
//! Both structs are plain serde types so the host page can pass them in as
//! JavaScript objects; nothing here reads global state except
//! [`ServiceConfig::from_env`], which is meant for native hosts.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decode::FilterType;
use crate::encode::OutputFormat;

/// Default bound for the on-screen raster width.
pub const DEFAULT_MAX_DISPLAY_WIDTH: u32 = 800;
/// Default bound for the on-screen raster height.
pub const DEFAULT_MAX_DISPLAY_HEIGHT: u32 = 600;

/// Environment variable holding the remote OCR service key.
pub const OCR_API_KEY_VAR: &str = "OCRSPACE_API_KEY";
/// Environment variable holding the LLM service key.
pub const LLM_API_KEY_VAR: &str = "GROQ_API_KEY";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Display bounds must be non-zero, got {width}x{height}")]
    ZeroDisplayBounds { width: u32, height: u32 },

    #[error("Outline width must be between 1 and {max}, got {actual}")]
    OutlineWidth { actual: u32, max: u32 },

    #[error("Missing service key: {0}")]
    MissingKey(&'static str),
}

/// Cropper settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CropperConfig {
    /// Maximum width of the display raster in pixels.
    pub max_display_width: u32,
    /// Maximum height of the display raster in pixels.
    pub max_display_height: u32,
    /// Filter used when downscaling to the display raster.
    pub display_filter: FilterType,
    /// RGB color of the selection outline.
    pub outline_color: [u8; 3],
    /// Outline thickness in display pixels.
    pub outline_width: u32,
    /// Format the cropped image is re-encoded to.
    pub output_format: OutputFormat,
    /// Quality used when `output_format` is JPEG.
    pub jpeg_quality: u8,
}

impl CropperConfig {
    const MAX_OUTLINE_WIDTH: u32 = 16;

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_display_width == 0 || self.max_display_height == 0 {
            return Err(ConfigError::ZeroDisplayBounds {
                width: self.max_display_width,
                height: self.max_display_height,
            });
        }
        if self.outline_width == 0 || self.outline_width > Self::MAX_OUTLINE_WIDTH {
            return Err(ConfigError::OutlineWidth {
                actual: self.outline_width,
                max: Self::MAX_OUTLINE_WIDTH,
            });
        }
        Ok(())
    }
}

impl Default for CropperConfig {
    fn default() -> Self {
        Self {
            max_display_width: DEFAULT_MAX_DISPLAY_WIDTH,
            max_display_height: DEFAULT_MAX_DISPLAY_HEIGHT,
            display_filter: FilterType::Bilinear,
            outline_color: [255, 0, 0],
            outline_width: 2,
            output_format: OutputFormat::Png,
            jpeg_quality: 90,
        }
    }
}

/// API keys for the remote OCR service and the LLM relay.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ServiceConfig {
    pub ocr_api_key: Option<String>,
    pub llm_api_key: Option<String>,
}

impl ServiceConfig {
    /// Read keys from `OCRSPACE_API_KEY` and `GROQ_API_KEY`. Empty values
    /// count as missing.
    pub fn from_env() -> Self {
        let read = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
        Self {
            ocr_api_key: read(OCR_API_KEY_VAR),
            llm_api_key: read(LLM_API_KEY_VAR),
        }
    }

    pub fn ocr_key(&self) -> Result<&str, ConfigError> {
        self.ocr_api_key
            .as_deref()
            .ok_or(ConfigError::MissingKey(OCR_API_KEY_VAR))
    }

    pub fn llm_key(&self) -> Result<&str, ConfigError> {
        self.llm_api_key
            .as_deref()
            .ok_or(ConfigError::MissingKey(LLM_API_KEY_VAR))
    }
}

impl std::fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |key: &Option<String>| key.as_ref().map(|_| "<redacted>");
        f.debug_struct("ServiceConfig")
            .field("ocr_api_key", &redact(&self.ocr_api_key))
            .field("llm_api_key", &redact(&self.llm_api_key))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = CropperConfig::default();
        assert_eq!(config.max_display_width, 800);
        assert_eq!(config.max_display_height, 600);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_bounds_rejected() {
        let mut config = CropperConfig::default();
        config.max_display_height = 0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::ZeroDisplayBounds {
                width: 800,
                height: 0
            })
        );
    }

    #[test]
    fn test_outline_width_bounds() {
        let mut config = CropperConfig::default();
        config.outline_width = 0;
        assert!(config.validate().is_err());
        config.outline_width = 17;
        assert!(config.validate().is_err());
        config.outline_width = 16;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: CropperConfig =
            serde_json::from_str(r#"{"maxDisplayWidth": 1024, "outputFormat": "jpeg"}"#).unwrap();
        assert_eq!(config.max_display_width, 1024);
        assert_eq!(config.max_display_height, 600);
        assert_eq!(config.output_format, OutputFormat::Jpeg);
    }

    #[test]
    fn test_service_keys() {
        let services = ServiceConfig {
            ocr_api_key: Some("ocr-secret".to_string()),
            llm_api_key: None,
        };
        assert_eq!(services.ocr_key(), Ok("ocr-secret"));
        assert_eq!(
            services.llm_key(),
            Err(ConfigError::MissingKey("GROQ_API_KEY"))
        );
    }

    #[test]
    fn test_service_config_debug_redacts_keys() {
        let services = ServiceConfig {
            ocr_api_key: Some("ocr-secret".to_string()),
            llm_api_key: Some("llm-secret".to_string()),
        };
        let debug = format!("{:?}", services);
        assert!(!debug.contains("secret"));
        assert!(debug.contains("<redacted>"));
    }
}
