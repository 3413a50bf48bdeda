use prost_types::{DescriptorProto, EnumDescriptorProto, FileDescriptorProto};
use serde::Serialize;

use super::{GeneratedFile, Generator, GeneratorContext};
use crate::GenerateError;

/// Dumps a file's messages and enums as `<file>.json`.
///
/// Items are listed in traversal order: top-level enums, then each message
/// followed by its nested enums and nested messages. Nested items carry
/// their enclosing message in `package`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonGenerator;

const ROOT_PACKAGE: &str = "<root>";

#[derive(Debug, Serialize)]
struct Item<'a> {
    package: String,
    filename: &'a str,
    name: &'a str,
    #[serde(flatten)]
    body: Body<'a>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
enum Body<'a> {
    Message { properties: Vec<Property<'a>> },
    Enum { values: Vec<Value<'a>> },
}

#[derive(Debug, Serialize)]
struct Property<'a> {
    name: &'a str,
    number: i32,
    label: &'static str,
    #[serde(rename = "type")]
    ty: &'static str,
    type_name: &'a str,
}

#[derive(Debug, Serialize)]
struct Value<'a> {
    name: &'a str,
    value: i32,
}

impl Generator for JsonGenerator {
    fn generate(
        &self,
        file: &FileDescriptorProto,
        _context: &GeneratorContext,
    ) -> Result<Vec<GeneratedFile>, GenerateError> {
        let package = file.package();
        let mut items = Vec::new();
        for e in &file.enum_type {
            items.push(enum_item(file.name(), package, e));
        }
        for m in &file.message_type {
            push_message(file.name(), package, m, &mut items);
        }

        Ok(vec![GeneratedFile {
            name: format!("{}.json", file.name()),
            content: serde_json::to_string_pretty(&items)?,
        }])
    }
}

fn push_message<'a>(filename: &'a str, package: &str, m: &'a DescriptorProto, items: &mut Vec<Item<'a>>) {
    let properties = m
        .field
        .iter()
        .map(|f| Property {
            name: f.name(),
            number: f.number(),
            label: f.label().as_str_name(),
            ty: f.r#type().as_str_name(),
            type_name: f.type_name().trim_start_matches('.'),
        })
        .collect();
    items.push(Item {
        package: display_package(package),
        filename,
        name: m.name(),
        body: Body::Message { properties },
    });

    let scope = match package {
        "" => m.name().to_string(),
        p => format!("{p}.{}", m.name()),
    };
    for e in &m.enum_type {
        items.push(enum_item(filename, &scope, e));
    }
    for nested in &m.nested_type {
        push_message(filename, &scope, nested, items);
    }
}

fn enum_item<'a>(filename: &'a str, package: &str, e: &'a EnumDescriptorProto) -> Item<'a> {
    Item {
        package: display_package(package),
        filename,
        name: e.name(),
        body: Body::Enum {
            values: e
                .value
                .iter()
                .map(|v| Value {
                    name: v.name(),
                    value: v.number(),
                })
                .collect(),
        },
    }
}

fn display_package(package: &str) -> String {
    if package.is_empty() {
        ROOT_PACKAGE.to_string()
    } else {
        package.to_string()
    }
}
