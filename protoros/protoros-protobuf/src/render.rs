use std::fmt::{Result, Write};

use protoros_core::{EnumType, Field, MessageType, SchemaFile, TypeName, TypeRef, ensure_zero_first};

pub const GENERATED_HEADER: &str = "// This file was generated. DO NOT EDIT!";

const INDENT: &str = "  ";

/// Render a proto-flavored schema file as `.proto` text.
pub fn render_proto(file: &SchemaFile) -> std::result::Result<String, std::fmt::Error> {
    let mut out = String::new();
    writeln!(out, "{GENERATED_HEADER}")?;
    writeln!(out)?;
    writeln!(out, "syntax = \"proto3\";")?;
    if !file.package.is_empty() {
        writeln!(out)?;
        writeln!(out, "package {};", file.package.join("."))?;
    }
    if !file.imports.is_empty() {
        writeln!(out)?;
        for import in &file.imports {
            writeln!(out, "import \"{import}\";")?;
        }
    }

    for message in &file.messages {
        writeln!(out)?;
        write_message(message, &file.package, 0, &mut out)?;
    }
    for e in &file.enums {
        writeln!(out)?;
        write_enum(e, 0, &mut out)?;
    }
    Ok(out)
}

fn write_comments(lines: &[String], pad: &str, out: &mut String) -> Result {
    for line in lines {
        if line.is_empty() {
            writeln!(out, "{pad}//")?;
        } else {
            writeln!(out, "{pad}// {line}")?;
        }
    }
    Ok(())
}

fn write_message(message: &MessageType, package: &[String], depth: usize, out: &mut String) -> Result {
    let pad = INDENT.repeat(depth);
    write_comments(&message.comments, &pad, out)?;
    writeln!(out, "{pad}message {} {{", message.name)?;
    for (i, field) in message.fields.iter().enumerate() {
        write_field(field, i, package, depth + 1, out)?;
    }
    for e in &message.nested_enums {
        write_enum(e, depth + 1, out)?;
    }
    for nested in &message.nested_messages {
        write_message(nested, package, depth + 1, out)?;
    }
    writeln!(out, "{pad}}}")
}

fn write_field(field: &Field, index: usize, package: &[String], depth: usize, out: &mut String) -> Result {
    let pad = INDENT.repeat(depth);
    write_comments(&field.comments, &pad, out)?;
    let label = if field.is_repeated() {
        "repeated "
    } else if field.optional {
        "optional "
    } else {
        ""
    };
    let ordinal = field.ordinal.unwrap_or(index as u32 + 1);
    writeln!(
        out,
        "{pad}{label}{} {} = {ordinal};",
        type_text(&field.ty, package),
        field.name
    )
}

fn write_enum(e: &EnumType, depth: usize, out: &mut String) -> Result {
    let pad = INDENT.repeat(depth);
    let e = ensure_zero_first(e);
    write_comments(&e.comments, &pad, out)?;
    writeln!(out, "{pad}enum {} {{", e.name)?;
    for value in &e.values {
        write_comments(&value.comments, &format!("{pad}{INDENT}"), out)?;
        writeln!(out, "{pad}{INDENT}{} = {};", value.name, value.number)?;
    }
    writeln!(out, "{pad}}}")
}

fn type_text(ty: &TypeRef, package: &[String]) -> String {
    match ty {
        TypeRef::Scalar(s) => s.to_proto().0.proto_keyword().unwrap_or("string").to_string(),
        TypeRef::WellKnown(wk) => wk.proto_name().to_string(),
        TypeRef::Message(name) | TypeRef::Enum(name) => relative(name, package),
        TypeRef::Named(raw) => raw.trim_start_matches('.').replace('/', "."),
    }
}

fn relative(name: &TypeName, package: &[String]) -> String {
    if name.package == package {
        name.path.join(".")
    } else {
        name.qualified()
    }
}
