//! protod2 - Protocol buffer schemas rendered as D2 diagrams.
//!
//! Generation pipeline for the `protoc-gen-d2` plugin. Each target `.proto`
//! file is translated into a D2 diagram document (services, enums, and
//! messages as class blocks) and rendered to SVG through the external `d2`
//! executable, yielding one image per schema file.

pub mod config;
pub mod render;

mod emit;
mod error;

pub use error::Protod2Error;
pub use prost_reflect::FileDescriptor;

use log::{debug, info};
use prost_reflect::DescriptorPool;
use prost_types::FileDescriptorSet;
use prost_types::compiler::{CodeGeneratorRequest, CodeGeneratorResponse, code_generator_response};
use std::path::Path;

use config::AppConfig;
use render::{D2Cli, Renderer};

/// Pipeline from a protoc code generation request to rendered diagrams.
///
/// # Examples
///
/// ```rust,no_run
/// use prost_types::compiler::CodeGeneratorRequest;
/// use protod2::{Generator, config::AppConfig};
///
/// let request = CodeGeneratorRequest::default();
///
/// let generator = Generator::new(AppConfig::default());
/// let response = generator.generate(&request)
///     .expect("Failed to generate diagrams");
/// ```
pub struct Generator {
    config: AppConfig,
    renderer: Box<dyn Renderer>,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

impl Generator {
    /// Create a new generator with the given configuration, rendering
    /// through the `d2` executable from `PATH`.
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            renderer: Box::new(D2Cli::default()),
        }
    }

    /// Replace the renderer, e.g. with a different `d2` binary path or a
    /// test double.
    pub fn with_renderer(self, renderer: Box<dyn Renderer>) -> Self {
        Self { renderer, ..self }
    }

    /// Produce the diagram document for a single schema file without
    /// rendering it.
    pub fn diagram_source(&self, file: &FileDescriptor) -> String {
        emit::file_diagram(file)
    }

    /// Process a code generation request into a response carrying one SVG
    /// per target file.
    ///
    /// Target files are processed in request order. The output path of
    /// each diagram is the input path with its extension replaced by
    /// `.svg`.
    ///
    /// # Errors
    ///
    /// Returns `Protod2Error` for:
    /// - An unresolvable descriptor set
    /// - A target file missing from the descriptor set
    /// - An invalid parameter string
    /// - Renderer failures
    ///
    /// The first error aborts the whole batch; no partial response is
    /// returned.
    pub fn generate(
        &self,
        request: &CodeGeneratorRequest,
    ) -> Result<CodeGeneratorResponse, Protod2Error> {
        let mut render_config = self.config.render().clone();
        if let Some(parameter) = request.parameter.as_deref() {
            render_config.apply_parameter(parameter)?;
        }

        let pool = DescriptorPool::from_file_descriptor_set(FileDescriptorSet {
            file: request.proto_file.clone(),
        })?;

        let mut files = Vec::with_capacity(request.file_to_generate.len());
        for name in &request.file_to_generate {
            let file = pool
                .get_file_by_name(name)
                .ok_or_else(|| Protod2Error::MissingFile(name.clone()))?;

            info!(file = name.as_str(); "Generating diagram");
            let source = emit::file_diagram(&file);
            debug!(file = name.as_str(); "Diagram document:\n{source}");

            let svg = self.renderer.render(&source, &render_config)?;

            files.push(code_generator_response::File {
                name: Some(svg_path(name)),
                content: Some(svg),
                ..Default::default()
            });
        }

        Ok(CodeGeneratorResponse {
            supported_features: Some(code_generator_response::Feature::Proto3Optional as u64),
            file: files,
            ..Default::default()
        })
    }
}

/// Output path for a schema file: the input path with its extension
/// replaced by `.svg`.
fn svg_path(input: &str) -> String {
    Path::new(input)
        .with_extension("svg")
        .to_string_lossy()
        .into_owned()
}
