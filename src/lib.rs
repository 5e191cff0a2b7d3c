// Library exports for passenger-eda

pub mod analysis;
pub mod clean;
pub mod csv_reader;
pub mod data;
pub mod display;
pub mod error;
pub mod graph;
pub mod input;
pub mod inspect;
pub mod palette;
pub mod pipeline;
pub mod stats;

use serde::Deserialize;

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[serde(rename = "png")]
    #[default]
    Png,
    #[serde(rename = "svg")]
    Svg,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Svg => "svg",
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RenderOptions {
    /// Pixels per inch of figure size
    #[serde(default = "default_dpi")]
    pub dpi: u32,
    #[serde(default, rename = "type")]
    pub format: OutputFormat,
}

fn default_dpi() -> u32 { 100 }

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            dpi: default_dpi(),
            format: OutputFormat::Png,
        }
    }
}

impl RenderOptions {
    /// Parse options from a JSON object; missing fields take their defaults
    pub fn from_json(json: &str) -> error::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Pixel size of a figure given in inches
    pub fn pixels(&self, inches: (f64, f64)) -> (u32, u32) {
        let dpi = self.dpi.max(1) as f64;
        ((inches.0 * dpi).round() as u32, (inches.1 * dpi).round() as u32)
    }
}
