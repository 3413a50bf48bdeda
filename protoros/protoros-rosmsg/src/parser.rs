//! Builds a [`SchemaFile`] from `.msg` text, one [`Line`] at a time.
//!
//! The message name is the file stem and the package is the directory the
//! file lives in (`pkg/Type.msg` and `pkg/msg/Type.msg` both give `pkg`).
//! Bounds are kept on the field as [`Bound`]s so the mapper can report them;
//! every array suffix becomes [`Repetition::Repeated`].
//!
//! Comment attachment: comment blocks before the first declaration that are
//! followed by a blank line document the message; every other comment block
//! documents the next declaration.

use std::collections::HashSet;

use protoros_core::{
    Bound, Constant, Field, MessageType, ParseError, Repetition, SchemaFile, Syntax, TypeRef,
};

use crate::grammar::{ArraySuffix, BaseType, FieldDecl, Line, TypeSpec, parse_line};

/// Parse one `.msg` file. The first malformed line aborts the file.
pub fn parse(text: &str, file_name: &str) -> Result<SchemaFile, ParseError> {
    let (package, name) = split_file_name(file_name).map_err(|reason| ParseError {
        file: file_name.to_string(),
        line: 0,
        column: 0,
        text: String::new(),
        reason,
    })?;

    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut message = MessageType::new(name);
    let mut pending: Vec<String> = Vec::new();
    let mut seen_declaration = false;
    let mut names: HashSet<&str> = HashSet::new();

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let error = |column: usize, reason: String| ParseError {
            file: file_name.to_string(),
            line: line_no,
            column,
            text: raw.to_string(),
            reason,
        };

        let line = parse_line(raw).map_err(|e| error(e.column, e.reason))?;
        let declared = match &line {
            Line::Constant(c) => Some((c.name, c.name_column)),
            Line::Field(f) => Some((f.name, f.name_column)),
            _ => None,
        };
        if let Some((declared, column)) = declared
            && !names.insert(declared)
        {
            return Err(error(column, format!("duplicate name `{declared}`")));
        }

        match line {
            Line::Blank => {
                if !seen_declaration {
                    message.comments.append(&mut pending);
                }
            }
            Line::Comment(comment) => pending.push(comment.to_string()),
            Line::Constant(decl) => {
                seen_declaration = true;
                let mut constant = Constant::new(decl.name, decl.ty, decl.value);
                constant.anchor = Some(message.fields.len());
                constant.comments = std::mem::take(&mut pending);
                constant.comments.extend(decl.comment.map(ToString::to_string));
                message.constants.push(constant);
            }
            Line::Field(decl) => {
                seen_declaration = true;
                let mut field = build_field(&decl);
                field.comments = std::mem::take(&mut pending);
                field.comments.extend(decl.comment.map(ToString::to_string));
                message.fields.push(field);
            }
        }
    }
    message.comments.append(&mut pending);

    let field_count = message.fields.len();
    for constant in &mut message.constants {
        constant.anchor = constant.anchor.filter(|i| *i < field_count);
    }

    log::debug!(
        "parsed {file_name}: {} fields, {} constants",
        message.fields.len(),
        message.constants.len()
    );

    let mut file = SchemaFile::new(file_name, Syntax::RosMsg).with_package(package);
    file.messages.push(message);
    Ok(file)
}

fn build_field(decl: &FieldDecl<'_>) -> Field {
    let TypeSpec {
        base,
        string_bound,
        array,
    } = decl.ty;

    let ty = match base {
        BaseType::Scalar(s) => TypeRef::Scalar(s),
        BaseType::Named(name) => TypeRef::Named(name.to_string()),
    };
    let mut field = Field::new(decl.name, ty);
    field.default = decl.default.map(ToString::to_string);
    if let Some(n) = string_bound {
        field.bounds.push(Bound::BoundedString(n));
    }
    match array {
        None => {}
        Some(ArraySuffix::Unbounded) => field.repetition = Repetition::Repeated,
        Some(ArraySuffix::Fixed(n)) => {
            field.repetition = Repetition::Repeated;
            field.bounds.push(Bound::FixedArray(n));
        }
        Some(ArraySuffix::Bounded(n)) => {
            field.repetition = Repetition::Repeated;
            field.bounds.push(Bound::BoundedArray(n));
        }
    }
    field
}

/// `"a/geometry_msgs/msg/Point.msg"` → `(["geometry_msgs"], "Point")`.
fn split_file_name(file_name: &str) -> Result<(Vec<String>, String), String> {
    let mut parts: Vec<&str> = file_name
        .split(['/', '\\'])
        .filter(|p| !p.is_empty() && *p != ".")
        .collect();
    let leaf = parts
        .pop()
        .ok_or_else(|| "empty file name".to_string())?;
    let stem = leaf.strip_suffix(".msg").unwrap_or(leaf);

    let valid = stem.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
        && stem.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid {
        return Err(format!("`{stem}` is not a valid message name"));
    }

    if parts.last() == Some(&"msg") {
        parts.pop();
    }
    let package = parts.last().map(|p| vec![p.to_string()]).unwrap_or_default();
    Ok((package, stem.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn package_comes_from_parent_directory() {
        assert_eq!(
            split_file_name("src/geometry_msgs/msg/Point.msg").unwrap(),
            (vec!["geometry_msgs".to_string()], "Point".to_string())
        );
        assert_eq!(
            split_file_name("nav/Odometry.msg").unwrap(),
            (vec!["nav".to_string()], "Odometry".to_string())
        );
        assert_eq!(split_file_name("Point.msg").unwrap(), (vec![], "Point".to_string()));
        assert!(split_file_name("dir/1Bad.msg").is_err());
    }
}
