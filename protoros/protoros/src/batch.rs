//! ROS → proto batch pipeline.
//!
//! ```text
//! sources ──parse (parallel)──▶ SchemaFiles ──▶ SymbolTable
//!                                    │               │
//!                                    └──map_to_proto─┴──render_proto (parallel)──▶ MsgBatch
//! ```

use protoros_core::{LossRecord, SchemaFile, SymbolTable, TranslateError, map_to_proto};
use protoros_protobuf::render_proto;
use protoros_rosmsg::parse;
use rayon::prelude::*;

use crate::BatchError;

/// One `.msg` file to translate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MsgSource {
    /// Path used to derive the message and package names, e.g. `nav/msg/Odometry.msg`.
    pub file_name: String,
    pub text: String,
}

impl MsgSource {
    pub fn new(file_name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            text: text.into(),
        }
    }
}

/// A rendered `.proto` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtoOutput {
    /// Relative output path, `pkg/snake_case.proto`.
    pub file_name: String,
    pub text: String,
    pub losses: Vec<LossRecord>,
}

#[derive(Debug)]
pub struct MsgResult {
    /// [`MsgSource::file_name`] of the input.
    pub source: String,
    pub result: Result<ProtoOutput, BatchError>,
}

/// Results of [`translate_msg_batch`], in input order.
#[derive(Debug, Default)]
pub struct MsgBatch {
    pub results: Vec<MsgResult>,
}

impl MsgBatch {
    pub fn outputs(&self) -> impl Iterator<Item = &ProtoOutput> {
        self.results.iter().filter_map(|r| r.result.as_ref().ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &BatchError)> {
        self.results
            .iter()
            .filter_map(|r| r.result.as_ref().err().map(|e| (r.source.as_str(), e)))
    }

    pub fn is_success(&self) -> bool {
        self.failures().next().is_none()
    }
}

/// Translate a batch of `.msg` sources to `.proto` text.
///
/// Every source is parsed first; the files that parse form one symbol table
/// so references between them resolve. `package_override` (`a.b` or `a/b`)
/// replaces the package derived from each file name. A failing file never
/// stops the others.
pub fn translate_msg_batch(sources: &[MsgSource], package_override: Option<&str>) -> MsgBatch {
    let package = package_override.map(split_package);
    let parsed: Vec<Result<SchemaFile, TranslateError>> = sources
        .par_iter()
        .map(|source| -> Result<SchemaFile, TranslateError> {
            let mut file = parse(&source.text, &source.file_name)?;
            if let Some(package) = &package {
                file.package = package.clone();
            }
            Ok(file)
        })
        .collect();

    let mut symbols = SymbolTable::default();
    for file in parsed.iter().flatten() {
        symbols.add_file(file);
    }
    log::debug!("symbol table: {} types from {} files", symbols.len(), sources.len());

    let results = sources
        .par_iter()
        .zip(parsed.par_iter())
        .map(|(source, file)| {
            let result = file
                .as_ref()
                .map_err(|e| BatchError::from(e.clone()))
                .and_then(|file| translate_file(file, &symbols));
            if let Err(e) = &result {
                log::warn!("{}: {e}", source.file_name);
            }
            MsgResult {
                source: source.file_name.clone(),
                result,
            }
        })
        .collect();
    MsgBatch { results }
}

fn translate_file(file: &SchemaFile, symbols: &SymbolTable) -> Result<ProtoOutput, BatchError> {
    let translation = map_to_proto(file, symbols)?;
    Ok(ProtoOutput {
        text: render_proto(&translation.file)?,
        file_name: translation.file.name,
        losses: translation.losses,
    })
}

fn split_package(package: &str) -> Vec<String> {
    package
        .split(['.', '/'])
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}
