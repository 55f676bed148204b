//! Error types for diagram generation.
//!
//! This module provides the main error type [`Protod2Error`] which wraps
//! the error conditions that can occur while turning a code generation
//! request into rendered diagrams. Every variant is terminal for the
//! batch: the first failure aborts the run with no partial output.

use std::io;

use thiserror::Error;

use crate::render::RenderError;

/// The main error type for protod2 operations.
#[derive(Debug, Error)]
pub enum Protod2Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("failed to decode protobuf input: {0}")]
    Decode(#[from] prost::DecodeError),

    #[error("invalid descriptor set: {0}")]
    Descriptor(#[from] prost_reflect::DescriptorError),

    #[error("file requested for generation is not in the descriptor set: {0}")]
    MissingFile(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("render error: {0}")]
    Render(#[from] RenderError),
}
