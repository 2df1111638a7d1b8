//! Configuration of the spiral rendering
use crate::{RasterImage, Rasterizer, RenderError, RenderStyle, SpiralParams};
use std::fmt;

/// Spiral parameters together with the style and the rasterizer used to render it
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    pub spiral: SpiralParams,
    pub style: RenderStyle,
    pub rasterizer: Rasterizer,
}

impl Config {
    /// Build spiral and render it into an image
    pub fn render(&self) -> Result<RasterImage, RenderError> {
        let path = self.spiral.build();
        self.rasterizer.rasterize(path, &self.style)
    }

    /// Load configuration from JSON, missing fields are set to their defaults
    #[cfg(feature = "serde")]
    pub fn from_json(reader: impl std::io::Read) -> Result<Self, ConfigError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Load configuration from a JSON file
    #[cfg(feature = "serde")]
    pub fn from_path(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let file = std::fs::File::open(path)?;
        Self::from_json(std::io::BufReader::new(file))
    }
}

/// Error while loading configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Malformed JSON document
    #[cfg(feature = "serde")]
    Json(serde_json::Error),
    /// IO error propagated while reading input stream
    Io(std::io::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            #[cfg(feature = "serde")]
            ConfigError::Json(error) => write!(f, "Invalid configuration: {}", error),
            ConfigError::Io(error) => write!(f, "Failed to read configuration: {}", error),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            #[cfg(feature = "serde")]
            ConfigError::Json(error) => Some(error),
            ConfigError::Io(error) => Some(error),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error)
    }
}

#[cfg(feature = "serde")]
impl From<serde_json::Error> for ConfigError {
    fn from(error: serde_json::Error) -> Self {
        Self::Json(error)
    }
}
