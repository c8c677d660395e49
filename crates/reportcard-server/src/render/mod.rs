//! Document renderer
//!
//! Turns a serializable context into PDF bytes: a named Handlebars template
//! produces the report text, then [`pdf::text_to_pdf`] lays it out.
//!
//! Templates render in strict mode, so a context that lacks a field the
//! template references is a [`RenderError::Context`] rather than a blank.

pub mod pdf;

use handlebars::{handlebars_helper, no_escape, Handlebars};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

use crate::config::RenderConfig;

/// Name the report card template is registered under
pub const REPORT_CARD_TEMPLATE: &str = "report_card";

const BUILTIN_REPORT_CARD: &str = include_str!("../../templates/report_card.hbs");

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("template '{0}' is not registered")]
    TemplateNotFound(String),

    #[error("invalid template '{name}': {message}")]
    Template { name: String, message: String },

    #[error("template '{name}' could not render the context: {message}")]
    Context { name: String, message: String },

    #[error("failed to read template file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to build PDF: {0}")]
    Pdf(String),
}

handlebars_helper!(pad: |value: str, width: u64| {
    format!("{:<width$}", value, width = width as usize)
});

/// Shared, cheaply cloneable template registry
#[derive(Debug, Clone)]
pub struct ReportRenderer {
    registry: Arc<Handlebars<'static>>,
}

impl ReportRenderer {
    /// Renderer with the built-in report card template
    pub fn new() -> Result<Self, RenderError> {
        Self::with_template(REPORT_CARD_TEMPLATE, BUILTIN_REPORT_CARD)
    }

    /// Renderer whose report card template is loaded from configuration
    pub fn from_config(config: &RenderConfig) -> Result<Self, RenderError> {
        match config.template_path {
            Some(ref path) => Self::from_file(path),
            None => Self::new(),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, RenderError> {
        let source = std::fs::read_to_string(path).map_err(|source| RenderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(path = %path.display(), "Loaded report card template");
        Self::with_template(REPORT_CARD_TEMPLATE, &source)
    }

    pub fn with_template(name: &str, source: &str) -> Result<Self, RenderError> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry.register_escape_fn(no_escape);
        registry.register_helper("pad", Box::new(pad));
        registry
            .register_template_string(name, source)
            .map_err(|e| RenderError::Template {
                name: name.to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            registry: Arc::new(registry),
        })
    }

    /// Fill the named template with `context`
    pub fn render_text<T: Serialize>(&self, name: &str, context: &T) -> Result<String, RenderError> {
        if !self.registry.has_template(name) {
            return Err(RenderError::TemplateNotFound(name.to_string()));
        }

        self.registry
            .render(name, context)
            .map_err(|e| RenderError::Context {
                name: name.to_string(),
                message: e.to_string(),
            })
    }

    /// Fill the named template and lay the result out as a PDF
    #[tracing::instrument(skip(self, context))]
    pub fn render<T: Serialize>(&self, name: &str, context: &T) -> Result<Vec<u8>, RenderError> {
        let text = self.render_text(name, context)?;
        let bytes = pdf::text_to_pdf("Report Card", &text)?;
        tracing::debug!(size = bytes.len(), "Rendered PDF");
        Ok(bytes)
    }
}
