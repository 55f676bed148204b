//! Translation of resolved schema declarations into D2 diagram documents.
//!
//! Each schema file becomes one document: a top-level `direction: down`
//! hint followed by up to three section containers (`Services`, `Enums`,
//! `Messages`, in that order). Every declared element is a nested block
//! with a `shape: class` annotation, so the rendered diagram reads like a
//! UML class diagram of the schema.
//!
//! The exact text produced here is a contract: it is consumed verbatim by
//! the external `d2` compiler, whose grammar expects the keyword spelling,
//! two-space nesting, and brace placement written below.

use std::fmt::Write;

use prost_reflect::{FieldDescriptor, FileDescriptor, Kind, MessageDescriptor};

/// Build the complete diagram document for one schema file.
///
/// Every file gets its own fresh buffer, so documents are independent of
/// each other and of processing order. Sections with no declarations are
/// omitted entirely; a file with no declarations at all yields only the
/// direction hint.
pub(crate) fn file_diagram(file: &FileDescriptor) -> String {
    let mut out = String::from("direction: down\n");

    section(&mut out, "Services", file.services(), |out, service| {
        for method in service.methods() {
            let _ = writeln!(
                out,
                "    {}({}): {}",
                method.name(),
                method.input().name(),
                method.output().name()
            );
        }
    });

    section(&mut out, "Enums", file.enums(), |out, en| {
        // Values are re-numbered by declaration position; the declared tag
        // numbers are not part of the diagram.
        for (position, value) in en.values().enumerate() {
            let _ = writeln!(out, "    {} = {}", value.name(), position);
        }
    });

    section(&mut out, "Messages", file.messages(), |out, message| {
        for (position, field) in message.fields().enumerate() {
            let _ = writeln!(
                out,
                "    {} {} = {}",
                field_type(&field),
                field.name(),
                position + 1
            );
        }
    });

    out
}

/// Named elements that become `shape: class` blocks inside a section.
trait ClassBlock {
    fn block_name(&self) -> &str;
}

impl ClassBlock for prost_reflect::ServiceDescriptor {
    fn block_name(&self) -> &str {
        self.name()
    }
}

impl ClassBlock for prost_reflect::EnumDescriptor {
    fn block_name(&self) -> &str {
        self.name()
    }
}

impl ClassBlock for MessageDescriptor {
    fn block_name(&self) -> &str {
        self.name()
    }
}

/// Write one section container with a class block per element. Sections
/// without elements are omitted.
fn section<T: ClassBlock>(
    out: &mut String,
    title: &str,
    elements: impl Iterator<Item = T>,
    members: impl Fn(&mut String, &T),
) {
    let elements: Vec<T> = elements.collect();
    if elements.is_empty() {
        return;
    }

    let _ = writeln!(out, "{title}: {{");
    out.push_str("  direction: down\n");
    for element in elements {
        let _ = writeln!(out, "  {}: {{", element.block_name());
        out.push_str("    shape: class\n");
        members(out, &element);
        out.push_str("  }\n");
    }
    out.push_str("}\n");
}

/// Format a field's type classification as a space-joined token sequence.
///
/// The clauses are independent and accumulate: `repeated` when the field is
/// a list, `enum <Name>` for enum references, `message <Name>` for embedded
/// messages, `map<KEY, VALUE>` for maps, and finally the scalar display
/// name when [`scalar_display`] maps the kind. A repeated enum field thus
/// yields `repeated enum <Name>`, and a field whose kind has no scalar
/// display contributes no trailing token.
fn field_type(field: &FieldDescriptor) -> String {
    let kind = field.kind();
    let mut tokens: Vec<String> = Vec::new();

    if field.is_list() {
        tokens.push("repeated".to_owned());
    }

    if let Kind::Enum(reference) = &kind {
        tokens.push("enum".to_owned());
        tokens.push(reference.name().to_owned());
    }

    if let Kind::Message(embedded) = &kind {
        if field.is_map() {
            tokens.push(map_type(embedded));
        } else {
            tokens.push("message".to_owned());
            tokens.push(embedded.name().to_owned());
        }
    }

    if let Some(scalar) = scalar_display(&kind) {
        tokens.push(scalar.to_owned());
    }

    tokens.join(" ")
}

/// Format a map field as `map<KEY, VALUE>`.
///
/// Both sides resolve through the scalar table, falling back to the
/// referenced type's own name when the kind has no scalar display (a
/// message- or enum-valued map).
fn map_type(entry: &MessageDescriptor) -> String {
    let key = entry.map_entry_key_field();
    let value = entry.map_entry_value_field();
    format!(
        "map<{}, {}>",
        type_display(&key.kind()),
        type_display(&value.kind())
    )
}

fn type_display(kind: &Kind) -> String {
    if let Some(scalar) = scalar_display(kind) {
        return scalar.to_owned();
    }
    match kind {
        Kind::Message(message) => message.name().to_owned(),
        Kind::Enum(reference) => reference.name().to_owned(),
        // Every scalar kind has a display name, so nothing reaches here.
        _ => String::new(),
    }
}

/// Fixed display-name table for scalar wire types.
///
/// Message and enum kinds have no scalar display and yield `None`.
fn scalar_display(kind: &Kind) -> Option<&'static str> {
    match kind {
        Kind::Double => Some("DOUBLE"),
        Kind::Float => Some("FLOAT"),
        Kind::Int32 => Some("INT32"),
        Kind::Int64 => Some("INT64"),
        Kind::Uint32 => Some("UINT32"),
        Kind::Uint64 => Some("UINT64"),
        Kind::Sint32 => Some("SINT32"),
        Kind::Sint64 => Some("SINT64"),
        Kind::Fixed32 => Some("FIXED32"),
        Kind::Fixed64 => Some("FIXED64"),
        Kind::Sfixed32 => Some("SFIXED32"),
        Kind::Sfixed64 => Some("SFIXED64"),
        Kind::Bool => Some("BOOL"),
        Kind::String => Some("STRING"),
        Kind::Bytes => Some("BYTES"),
        _ => None,
    }
}
