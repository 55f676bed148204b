//! Command-line argument definitions for the protoc-gen-d2 binary.
//!
//! When protoc invokes the plugin there are no arguments at all; the
//! request arrives on stdin. The flags below exist for standalone
//! rendering from a serialized descriptor set and for local debugging.

use std::path::PathBuf;

use clap::Parser;

/// Command-line arguments for protoc-gen-d2
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Render every file in this serialized FileDescriptorSet instead of
    /// acting as a protoc plugin
    #[arg(long, value_name = "FILE")]
    pub descriptor_set: Option<PathBuf>,

    /// Output directory for standalone rendering
    #[arg(short, long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}
