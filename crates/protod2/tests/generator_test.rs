//! Integration tests for the Generator pipeline.
//!
//! The renderer seam is replaced with a test double so the pipeline can be
//! exercised without a `d2` installation.

use std::cell::RefCell;
use std::rc::Rc;

use prost_types::compiler::CodeGeneratorRequest;
use prost_types::{
    DescriptorProto, FieldDescriptorProto, FileDescriptorProto,
    field_descriptor_proto::{Label, Type},
};

use protod2::config::{AppConfig, RenderConfig};
use protod2::render::{RenderError, Renderer};
use protod2::{Generator, Protod2Error};

/// Records every render call and returns a placeholder image.
#[derive(Default)]
struct RecordingRenderer {
    calls: Rc<RefCell<Vec<(String, u32, u32)>>>,
}

impl Renderer for RecordingRenderer {
    fn render(&self, source: &str, config: &RenderConfig) -> Result<String, RenderError> {
        self.calls
            .borrow_mut()
            .push((source.to_owned(), config.theme(), config.pad()));
        Ok(format!("<svg>{}</svg>", self.calls.borrow().len()))
    }
}

struct FailingRenderer;

impl Renderer for FailingRenderer {
    fn render(&self, _source: &str, _config: &RenderConfig) -> Result<String, RenderError> {
        Err(RenderError::Failed {
            stderr: "unexpected token".to_owned(),
        })
    }
}

fn proto_file(name: &str, package: &str, messages: Vec<DescriptorProto>) -> FileDescriptorProto {
    FileDescriptorProto {
        name: Some(name.to_owned()),
        package: Some(package.to_owned()),
        syntax: Some("proto3".to_owned()),
        message_type: messages,
        ..Default::default()
    }
}

fn simple_message(name: &str) -> DescriptorProto {
    DescriptorProto {
        name: Some(name.to_owned()),
        field: vec![FieldDescriptorProto {
            name: Some("id".to_owned()),
            number: Some(1),
            label: Some(Label::Optional as i32),
            r#type: Some(Type::Int64 as i32),
            ..Default::default()
        }],
        ..Default::default()
    }
}

fn two_file_request() -> CodeGeneratorRequest {
    CodeGeneratorRequest {
        file_to_generate: vec!["api/v1/user.proto".to_owned(), "misc.proto".to_owned()],
        proto_file: vec![
            proto_file("api/v1/user.proto", "api.v1", vec![simple_message("User")]),
            proto_file("misc.proto", "misc", vec![simple_message("Misc")]),
        ],
        ..Default::default()
    }
}

fn recording_generator() -> (Generator, Rc<RefCell<Vec<(String, u32, u32)>>>) {
    let renderer = RecordingRenderer::default();
    let calls = Rc::clone(&renderer.calls);
    let generator = Generator::new(AppConfig::default()).with_renderer(Box::new(renderer));
    (generator, calls)
}

#[test]
fn test_one_output_file_per_input_file() {
    let (generator, _calls) = recording_generator();

    let response = generator
        .generate(&two_file_request())
        .expect("generation should succeed");

    let names: Vec<_> = response
        .file
        .iter()
        .map(|f| f.name.as_deref().unwrap_or_default())
        .collect();
    assert_eq!(names, ["api/v1/user.svg", "misc.svg"]);

    for file in &response.file {
        let content = file.content.as_deref().unwrap_or_default();
        assert!(content.starts_with("<svg>"), "unexpected content: {content}");
    }
}

#[test]
fn test_declares_proto3_optional_support() {
    let (generator, _calls) = recording_generator();
    let response = generator
        .generate(&two_file_request())
        .expect("generation should succeed");
    assert_eq!(response.supported_features, Some(1));
}

#[test]
fn test_each_file_gets_a_fresh_document() {
    let (generator, calls) = recording_generator();

    generator
        .generate(&two_file_request())
        .expect("generation should succeed");

    let calls = calls.borrow();
    assert_eq!(calls.len(), 2);
    for (source, _, _) in calls.iter() {
        assert!(
            source.starts_with("direction: down\n"),
            "document should start with the direction hint: {source}"
        );
    }
    // Nothing from the first file may leak into the second document.
    assert!(calls[0].0.contains("User"));
    assert!(!calls[1].0.contains("User"));
    assert!(calls[1].0.contains("Misc"));
}

#[test]
fn test_parameter_string_reaches_the_renderer() {
    let (generator, calls) = recording_generator();

    let mut request = two_file_request();
    request.parameter = Some("theme=104,pad=50".to_owned());
    generator
        .generate(&request)
        .expect("generation should succeed");

    let calls = calls.borrow();
    assert!(calls.iter().all(|&(_, theme, pad)| theme == 104 && pad == 50));
}

#[test]
fn test_invalid_parameter_aborts_the_batch() {
    let (generator, calls) = recording_generator();

    let mut request = two_file_request();
    request.parameter = Some("palette=9".to_owned());
    let err = generator
        .generate(&request)
        .expect_err("unknown option should fail");

    assert!(matches!(err, Protod2Error::Config(_)));
    assert!(calls.borrow().is_empty(), "nothing should have been rendered");
}

#[test]
fn test_render_failure_aborts_the_batch() {
    let generator = Generator::new(AppConfig::default()).with_renderer(Box::new(FailingRenderer));

    let err = generator
        .generate(&two_file_request())
        .expect_err("render failure should propagate");

    match err {
        Protod2Error::Render(RenderError::Failed { stderr }) => {
            assert_eq!(stderr, "unexpected token");
        }
        other => panic!("expected render error, got {other:?}"),
    }
}

#[test]
fn test_missing_target_file_is_reported() {
    let (generator, _calls) = recording_generator();

    let mut request = two_file_request();
    request.file_to_generate.push("nope.proto".to_owned());
    let err = generator
        .generate(&request)
        .expect_err("unknown target should fail");

    match err {
        Protod2Error::MissingFile(name) => assert_eq!(name, "nope.proto"),
        other => panic!("expected missing file error, got {other:?}"),
    }
}

#[test]
fn test_diagram_source_without_rendering() {
    let (generator, calls) = recording_generator();

    let pool = prost_reflect::DescriptorPool::from_file_descriptor_set(
        prost_types::FileDescriptorSet {
            file: vec![proto_file("misc.proto", "misc", vec![simple_message("Misc")])],
        },
    )
    .expect("descriptor set should resolve");
    let file = pool
        .get_file_by_name("misc.proto")
        .expect("file should resolve");

    let source = generator.diagram_source(&file);
    assert!(source.starts_with("direction: down\n"));
    assert!(source.contains("  Misc: {\n"));
    assert!(calls.borrow().is_empty(), "nothing should have been rendered");
}

#[test]
fn test_empty_request_yields_empty_response() {
    let (generator, calls) = recording_generator();

    let response = generator
        .generate(&CodeGeneratorRequest::default())
        .expect("empty request should succeed");

    assert!(response.file.is_empty());
    assert!(calls.borrow().is_empty());
}
