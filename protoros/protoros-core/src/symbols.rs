//! Two-phase type resolution across a batch of files.
//!
//! Phase 1 ([`SymbolTable::build`]) collects every message and enum name of
//! every file in the batch. Phase 2 ([`resolve`]) replaces each
//! [`TypeRef::Named`] with a [`TypeRef::Message`], [`TypeRef::Enum`] or
//! [`TypeRef::WellKnown`] using the read-only table.
//!
//! # Lookup rules
//!
//! Proto references:
//! 1. **Well-known**: `.google.protobuf.*` types with a ROS counterpart;
//!    `Any` and the remaining `google.protobuf` types are unsupported.
//! 2. **Absolute**: a leading `.` is looked up verbatim.
//! 3. **Relative**: otherwise the enclosing scopes are searched from the
//!    innermost outwards, as `protoc` does.
//!
//! ROS references:
//! 1. **Well-known**: `builtin_interfaces/Time` and friends, in either the
//!    short or the `pkg/msg/Type` long form.
//! 2. **Same package**: `Type` is looked up in the file's own package;
//!    `Header` falls back to `std_msgs/Header`.
//! 3. **Qualified**: `pkg/Type` is looked up verbatim. A package that no
//!    file in the batch declares is an external dependency and is trusted.
//!
//! A name defined more than once in the batch never resolves; the reference
//! fails with an [`AmbiguousReferenceError`].

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::{
    error::{
        AmbiguousReferenceError, Construct, TranslateError, UnresolvedReferenceError,
        UnsupportedConstructError,
    },
    model::{EnumType, MessageType, SchemaFile, Syntax, TypeName, TypeRef},
    scalar::WellKnownType,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Message,
    Enum,
}

/// One named type visible to the batch.
#[derive(Debug, Clone)]
pub struct Symbol {
    pub name: TypeName,
    pub kind: SymbolKind,
    /// File that defines the type.
    pub file: String,
    /// Enum definition, needed to expand enum fields into constants.
    pub enum_def: Option<EnumType>,
}

/// Read-only index of every type defined by a batch of files.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    symbols: HashMap<String, Vec<Symbol>>,
    packages: HashSet<Vec<String>>,
    /// Message names keyed by `pkg.Innermost`, the name they get in ROS.
    flattened: HashMap<String, BTreeSet<String>>,
}

impl SymbolTable {
    /// Collect the names of all messages and enums, including nested ones.
    pub fn build(files: &[SchemaFile]) -> Self {
        let mut table = Self::default();
        for file in files {
            table.add_file(file);
        }
        log::debug!(
            "symbol table: {} names from {} files",
            table.symbols.len(),
            files.len()
        );
        table
    }

    pub fn add_file(&mut self, file: &SchemaFile) {
        self.packages.insert(file.package.clone());
        let root = TypeName::new(file.package.clone(), Vec::new());
        for e in &file.enums {
            self.insert_enum(&file.name, root.child(&e.name), e);
        }
        for m in &file.messages {
            self.insert_message(&file.name, &root, m);
        }
    }

    fn insert_message(&mut self, file: &str, scope: &TypeName, message: &MessageType) {
        let name = scope.child(&message.name);
        for e in &message.nested_enums {
            self.insert_enum(file, name.child(&e.name), e);
        }
        for nested in &message.nested_messages {
            self.insert_message(file, &name, nested);
        }
        let flat = TypeName::new(name.package.clone(), vec![name.name().to_string()]);
        self.flattened
            .entry(flat.qualified())
            .or_default()
            .insert(name.qualified());
        self.insert(Symbol {
            name,
            kind: SymbolKind::Message,
            file: file.to_string(),
            enum_def: None,
        });
    }

    fn insert_enum(&mut self, file: &str, name: TypeName, def: &EnumType) {
        self.insert(Symbol {
            name,
            kind: SymbolKind::Enum,
            file: file.to_string(),
            enum_def: Some(def.clone()),
        });
    }

    fn insert(&mut self, symbol: Symbol) {
        self.symbols
            .entry(symbol.name.qualified())
            .or_default()
            .push(symbol);
    }

    /// Look up a dotted name without a leading dot.
    ///
    /// `from_file` is only used to describe the referencing file in the
    /// ambiguity error.
    pub fn lookup(
        &self,
        qualified: &str,
        from_file: &str,
    ) -> Result<Option<&Symbol>, AmbiguousReferenceError> {
        match self.symbols.get(qualified).map(Vec::as_slice) {
            None | Some([]) => Ok(None),
            Some([single]) => Ok(Some(single)),
            Some(many) => Err(AmbiguousReferenceError {
                name: qualified.to_string(),
                file: from_file.to_string(),
                candidates: many.iter().map(|s| s.file.clone()).collect(),
            }),
        }
    }

    /// Distinct messages that end up with the same ROS name as `name` once
    /// nesting is flattened, or `None` when the flattened name is unique.
    pub fn flattened_collisions(&self, name: &TypeName) -> Option<Vec<String>> {
        let flat = TypeName::new(name.package.clone(), vec![name.name().to_string()]);
        self.flattened
            .get(&flat.qualified())
            .filter(|names| names.len() > 1)
            .map(|names| names.iter().cloned().collect())
    }

    /// Whether any file of the batch declares `package`.
    pub fn has_package(&self, package: &[String]) -> bool {
        self.packages.contains(package)
    }

    /// Enum definition for `name`, if it is a known, unambiguous enum.
    pub fn enum_def(&self, name: &TypeName) -> Option<&EnumType> {
        match self.symbols.get(&name.qualified()).map(Vec::as_slice) {
            Some([single]) => single.enum_def.as_ref(),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Resolve every [`TypeRef::Named`] in `file` against `symbols`.
///
/// Returns a new file; `file` itself is left untouched.
pub fn resolve(file: &SchemaFile, symbols: &SymbolTable) -> Result<SchemaFile, TranslateError> {
    let mut out = file.clone();
    let scope = TypeName::new(file.package.clone(), Vec::new());
    for message in &mut out.messages {
        resolve_message(file, &scope, message, symbols)?;
    }
    Ok(out)
}

fn resolve_message(
    file: &SchemaFile,
    scope: &TypeName,
    message: &mut MessageType,
    symbols: &SymbolTable,
) -> Result<(), TranslateError> {
    let name = scope.child(&message.name);
    for field in &mut message.fields {
        if let TypeRef::Named(raw) = &field.ty {
            field.ty = resolve_named(raw, file, &name, &field.name, symbols)?;
        }
    }
    for nested in &mut message.nested_messages {
        resolve_message(file, &name, nested, symbols)?;
    }
    Ok(())
}

fn resolve_named(
    raw: &str,
    file: &SchemaFile,
    current: &TypeName,
    field: &str,
    symbols: &SymbolTable,
) -> Result<TypeRef, TranslateError> {
    let unresolved = || UnresolvedReferenceError {
        name: raw.trim_start_matches('.').to_string(),
        file: file.name.clone(),
        message: current.path.join("."),
        field: field.to_string(),
    };

    match file.syntax {
        Syntax::Proto3 => {
            if let Some(wk) = WellKnownType::from_proto_name(raw) {
                return Ok(TypeRef::WellKnown(wk));
            }
            let bare = raw.trim_start_matches('.');
            if let Some(rest) = bare.strip_prefix("google.protobuf.") {
                let construct = if rest == "Any" {
                    Construct::Any
                } else {
                    Construct::WellKnown(bare.to_string())
                };
                return Err(UnsupportedConstructError::new(construct, &file.name)
                    .at(&current.path.join("."), Some(field))
                    .into());
            }
            let candidates = if raw.starts_with('.') {
                vec![bare.to_string()]
            } else {
                relative_candidates(current, bare)
            };
            for candidate in candidates {
                if let Some(symbol) = symbols.lookup(&candidate, &file.name)? {
                    return Ok(symbol_ref(symbol));
                }
            }
            Err(unresolved().into())
        }
        Syntax::RosMsg => {
            let parts: Vec<&str> = raw.split('/').filter(|s| !s.is_empty()).collect();
            let short = match parts.as_slice() {
                [package, "msg", name] => format!("{package}/{name}"),
                _ => raw.to_string(),
            };
            if let Some(wk) = WellKnownType::from_ros_name(&short) {
                return Ok(TypeRef::WellKnown(wk));
            }
            match parts.as_slice() {
                [name] => {
                    let wanted = TypeName::new(file.package.clone(), vec![name.to_string()]);
                    if let Some(symbol) = symbols.lookup(&wanted.qualified(), &file.name)? {
                        return Ok(symbol_ref(symbol));
                    }
                    if *name == "Header" {
                        return Ok(TypeRef::Message(TypeName::new(
                            vec!["std_msgs".to_string()],
                            vec!["Header".to_string()],
                        )));
                    }
                    Err(unresolved().into())
                }
                // `pkg/msg/Type` is the ROS 2 long form of `pkg/Type`.
                [package, name] | [package, "msg", name] => {
                    let wanted = TypeName::new(vec![package.to_string()], vec![name.to_string()]);
                    if let Some(symbol) = symbols.lookup(&wanted.qualified(), &file.name)? {
                        return Ok(symbol_ref(symbol));
                    }
                    if wanted.package == file.package || symbols.has_package(&wanted.package) {
                        return Err(unresolved().into());
                    }
                    log::debug!("'{raw}' refers to external package '{package}'");
                    Ok(TypeRef::Message(wanted))
                }
                _ => Err(unresolved().into()),
            }
        }
    }
}

/// Candidate absolute names for a relative proto reference, innermost scope first.
fn relative_candidates(current: &TypeName, name: &str) -> Vec<String> {
    let scope: Vec<&str> = current
        .package
        .iter()
        .chain(current.path.iter())
        .map(String::as_str)
        .collect();
    (0..=scope.len())
        .rev()
        .map(|i| {
            let mut parts = scope[..i].to_vec();
            parts.push(name);
            parts.join(".")
        })
        .collect()
}

fn symbol_ref(symbol: &Symbol) -> TypeRef {
    match symbol.kind {
        SymbolKind::Message => TypeRef::Message(symbol.name.clone()),
        SymbolKind::Enum => TypeRef::Enum(symbol.name.clone()),
    }
}
