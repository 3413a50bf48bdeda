use std::fmt::{Result, Write};

use protoros_core::{Constant, Field, MessageType, TypeName, TypeRef};

pub const GENERATED_HEADER: &str = "# This file was generated. DO NOT EDIT!";

/// Render a ROS-flavored message as `.msg` text.
///
/// References to types of `package` are written unqualified, everything
/// else as `pkg/Type`. Constants come after the fields; each documented
/// constant (the first of an enum group, typically) starts a new block.
pub fn render_ros(message: &MessageType, package: &[String]) -> std::result::Result<String, std::fmt::Error> {
    let mut out = String::new();
    writeln!(out, "{GENERATED_HEADER}")?;
    writeln!(out)?;
    writeln!(out, "# {}", message.name)?;
    write_comments(&message.comments, &mut out)?;

    for field in &message.fields {
        write_field(field, package, &mut out)?;
    }
    for constant in &message.constants {
        write_constant(constant, &mut out)?;
    }
    Ok(out)
}

fn write_comments(lines: &[String], out: &mut String) -> Result {
    for line in lines {
        if line.is_empty() {
            writeln!(out, "#")?;
        } else {
            writeln!(out, "# {line}")?;
        }
    }
    Ok(())
}

fn write_field(field: &Field, package: &[String], out: &mut String) -> Result {
    write_comments(&field.comments, out)?;
    let suffix = if field.is_repeated() { "[]" } else { "" };
    writeln!(out, "{}{suffix} {}", type_text(&field.ty, package), field.name)
}

fn write_constant(constant: &Constant, out: &mut String) -> Result {
    if !constant.comments.is_empty() {
        writeln!(out)?;
        write_comments(&constant.comments, out)?;
    }
    writeln!(out, "{} {}={}", constant.ty, constant.name, constant.value)
}

fn type_text(ty: &TypeRef, package: &[String]) -> String {
    match ty {
        TypeRef::Scalar(s) => s.to_string(),
        TypeRef::WellKnown(wk) => wk.ros_name().to_string(),
        TypeRef::Message(name) | TypeRef::Enum(name) => qualified(name, package),
        TypeRef::Named(raw) => raw.clone(),
    }
}

fn qualified(name: &TypeName, package: &[String]) -> String {
    if name.package.is_empty() || name.package == package {
        name.name().to_string()
    } else {
        format!("{}/{}", name.package.join("/"), name.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn foreign_package_is_qualified() {
        let pkg = vec!["nav".to_string()];
        let local = TypeName::new(pkg.clone(), vec!["Wheel".into()]);
        let foreign = TypeName::new(vec!["geometry_msgs".into()], vec!["Point".into()]);
        assert_eq!(qualified(&local, &pkg), "Wheel");
        assert_eq!(qualified(&foreign, &pkg), "geometry_msgs/Point");
    }
}
