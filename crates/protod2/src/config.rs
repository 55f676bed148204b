//! Configuration types for diagram rendering.
//!
//! [`AppConfig`] is the configuration root loaded from external sources
//! (the CLI discovers TOML files); [`RenderConfig`] carries the options
//! forwarded to the renderer. Defaults reproduce the tool's stock visual
//! output: the "Grape soda" D2 theme with 100 pixels of padding and the
//! dagre layout engine.
//!
//! The protoc parameter string (everything before the `:` in
//! `--d2_out=theme=104,pad=50:out`) can override individual options per
//! invocation; see [`RenderConfig::apply_parameter`].

use serde::Deserialize;

use crate::error::Protod2Error;

/// Default D2 theme identifier (6, "Grape soda").
pub const DEFAULT_THEME: u32 = 6;

/// Default padding in pixels around the rendered diagram.
pub const DEFAULT_PAD: u32 = 100;

/// Default layout engine name passed to d2.
pub const DEFAULT_LAYOUT: &str = "dagre";

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Render configuration section.
    #[serde(default)]
    render: RenderConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the specified render configuration.
    pub fn new(render: RenderConfig) -> Self {
        Self { render }
    }

    /// Returns the render configuration.
    pub fn render(&self) -> &RenderConfig {
        &self.render
    }
}

/// Options forwarded to the layout and render collaborator.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Visual theme identifier from the D2 theme catalog.
    theme: u32,

    /// Pixel margin around the rendered content.
    pad: u32,

    /// Layout engine name (`dagre`, `elk`, ...).
    layout: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            theme: DEFAULT_THEME,
            pad: DEFAULT_PAD,
            layout: DEFAULT_LAYOUT.to_owned(),
        }
    }
}

impl RenderConfig {
    /// Returns the theme identifier.
    pub fn theme(&self) -> u32 {
        self.theme
    }

    /// Returns the padding in pixels.
    pub fn pad(&self) -> u32 {
        self.pad
    }

    /// Returns the layout engine name.
    pub fn layout(&self) -> &str {
        &self.layout
    }

    /// Apply overrides from a protoc parameter string.
    ///
    /// The parameter is a comma-separated list of `key=value` entries.
    /// Recognized keys are `theme`, `pad`, and `layout`.
    ///
    /// # Errors
    ///
    /// Returns [`Protod2Error::Config`] for entries that are not
    /// `key=value`, carry an unparseable value, or use an unrecognized
    /// key.
    pub fn apply_parameter(&mut self, parameter: &str) -> Result<(), Protod2Error> {
        for entry in parameter.split(',').filter(|entry| !entry.is_empty()) {
            let (key, value) = entry.split_once('=').ok_or_else(|| {
                Protod2Error::Config(format!("expected key=value in parameter, got `{entry}`"))
            })?;

            match key {
                "theme" => {
                    self.theme = value.parse().map_err(|_| {
                        Protod2Error::Config(format!("invalid theme identifier `{value}`"))
                    })?;
                }
                "pad" => {
                    self.pad = value.parse().map_err(|_| {
                        Protod2Error::Config(format!("invalid padding `{value}`"))
                    })?;
                }
                "layout" => {
                    self.layout = value.to_owned();
                }
                _ => {
                    return Err(Protod2Error::Config(format!(
                        "unrecognized option `{key}` (expected theme, pad, or layout)"
                    )));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_stock_rendering() {
        let config = RenderConfig::default();
        assert_eq!(config.theme(), 6);
        assert_eq!(config.pad(), 100);
        assert_eq!(config.layout(), "dagre");
    }

    #[test]
    fn test_parameter_overrides() {
        let mut config = RenderConfig::default();
        config
            .apply_parameter("theme=104,pad=50,layout=elk")
            .expect("parameter should parse");

        assert_eq!(config.theme(), 104);
        assert_eq!(config.pad(), 50);
        assert_eq!(config.layout(), "elk");
    }

    #[test]
    fn test_empty_parameter_is_a_no_op() {
        let mut config = RenderConfig::default();
        config.apply_parameter("").expect("empty parameter is fine");
        assert_eq!(config.theme(), DEFAULT_THEME);
    }

    #[test]
    fn test_unrecognized_option_is_rejected() {
        let mut config = RenderConfig::default();
        let err = config
            .apply_parameter("palette=9")
            .expect_err("unknown key should fail");
        assert!(err.to_string().contains("palette"));
    }

    #[test]
    fn test_malformed_entry_is_rejected() {
        let mut config = RenderConfig::default();
        assert!(config.apply_parameter("theme").is_err());
        assert!(config.apply_parameter("pad=ten").is_err());
    }
}
