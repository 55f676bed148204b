//! CLI logic for the protoc-gen-d2 plugin.
//!
//! Two modes share one pipeline: the protoc plugin mode exchanges
//! `CodeGeneratorRequest`/`CodeGeneratorResponse` messages over stdin and
//! stdout, while the standalone mode reads a serialized descriptor set
//! from disk and writes the rendered diagrams itself.

mod args;
mod config;

pub use args::Args;

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use log::{error, info};
use prost::Message;
use prost_types::FileDescriptorSet;
use prost_types::compiler::{CodeGeneratorRequest, CodeGeneratorResponse};

use protod2::{Generator, Protod2Error};

/// Run the application in the mode selected by the arguments.
///
/// # Errors
///
/// Returns `Protod2Error` for:
/// - Configuration loading errors
/// - Transport errors (unreadable stdin, undecodable input)
/// - File I/O errors in standalone mode
/// - Generation and rendering errors in standalone mode
pub fn run(args: &Args) -> Result<(), Protod2Error> {
    let app_config = config::load_config(args.config.as_deref())?;
    let generator = Generator::new(app_config);

    match &args.descriptor_set {
        Some(path) => run_standalone(&generator, path, &args.out_dir),
        None => run_plugin(&generator),
    }
}

/// protoc plugin mode: one request on stdin, one response on stdout.
///
/// Generation failures are reported through the response's `error` field
/// with a zero exit status, per the plugin contract; only transport
/// failures propagate as errors.
fn run_plugin(generator: &Generator) -> Result<(), Protod2Error> {
    let mut buf = Vec::new();
    io::stdin().read_to_end(&mut buf)?;
    let request = CodeGeneratorRequest::decode(buf.as_slice())?;
    info!(files = request.file_to_generate.len(); "Received code generation request");

    let response = match generator.generate(&request) {
        Ok(response) => response,
        Err(err) => {
            error!("{err}");
            CodeGeneratorResponse {
                error: Some(err.to_string()),
                ..Default::default()
            }
        }
    };

    buf.clear();
    response
        .encode(&mut buf)
        .expect("writing to a Vec is infallible");
    io::stdout().write_all(&buf)?;

    Ok(())
}

/// Standalone mode: render every file of a serialized descriptor set.
fn run_standalone(
    generator: &Generator,
    descriptor_set: &Path,
    out_dir: &Path,
) -> Result<(), Protod2Error> {
    info!(
        descriptor_set = descriptor_set.display().to_string(),
        out_dir = out_dir.display().to_string();
        "Rendering descriptor set"
    );

    let bytes = fs::read(descriptor_set)?;
    let set = FileDescriptorSet::decode(bytes.as_slice())?;

    let request = CodeGeneratorRequest {
        file_to_generate: set.file.iter().filter_map(|file| file.name.clone()).collect(),
        proto_file: set.file,
        ..Default::default()
    };

    let response = generator.generate(&request)?;

    for file in response.file {
        let (Some(name), Some(content)) = (file.name, file.content) else {
            continue;
        };
        let target = out_dir.join(name);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&target, content)?;
        info!(output = target.display().to_string(); "Diagram written");
    }

    Ok(())
}
