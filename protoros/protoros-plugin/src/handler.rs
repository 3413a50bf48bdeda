//! `protoc` plugin protocol: one request on stdin, one response on stdout.
//!
//! ```text
//! AwaitingRequest ─▶ Decoding ─▶ Translating ─▶ Encoding ─▶ Done
//!        │               │             │
//!        └───────────────┴─────────────┴──────▶ Failed
//! ```
//!
//! Decode failures, and per-file failures under `strict`, are written as a
//! response carrying only the top-level `error`. Otherwise every failed file
//! is reported as a `<file>.error` entry and its siblings are still emitted.

use std::{
    collections::HashMap,
    io::{Read, Write},
};

use prost::Message;
use prost_types::{
    FileDescriptorProto,
    compiler::{CodeGeneratorRequest, CodeGeneratorResponse, code_generator_response::Feature},
};
use protoros_core::{DecodeError, SymbolTable};
use protoros_protobuf::file_skeleton;
use rayon::prelude::*;

use crate::{
    GenerateError, PluginError, PluginOptions,
    generator::{GeneratedFile, Generator, GeneratorContext},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerState {
    AwaitingRequest,
    Decoding,
    Translating,
    Encoding,
    Done,
    Failed,
}

/// Summary of a completed invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outcome {
    /// Names of the files written to the response, in request order.
    pub generated: Vec<String>,
    /// Requested files that failed, in request order.
    pub failed: Vec<String>,
}

/// Decode a serialized `CodeGeneratorRequest`.
pub fn decode_request(bytes: &[u8]) -> Result<CodeGeneratorRequest, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::Empty);
    }
    CodeGeneratorRequest::decode(bytes).map_err(|e| DecodeError::Malformed {
        source: Box::new(e),
    })
}

/// Drives one plugin invocation for a [`Generator`].
pub struct PluginHandler<G> {
    generator: G,
    options: PluginOptions,
    state: HandlerState,
}

impl<G: Generator> PluginHandler<G> {
    /// `options` are the defaults; the request's `parameter` overrides them.
    pub fn new(generator: G, options: PluginOptions) -> Self {
        Self {
            generator,
            options,
            state: HandlerState::AwaitingRequest,
        }
    }

    pub fn state(&self) -> HandlerState {
        self.state
    }

    /// Read the whole request from `reader` and write the response to `writer`.
    pub fn run<R: Read, W: Write>(&mut self, mut reader: R, mut writer: W) -> Result<Outcome, PluginError> {
        let mut bytes = Vec::new();
        if let Err(e) = reader.read_to_end(&mut bytes) {
            return self.fail(DecodeError::from(e).into(), &mut writer);
        }

        self.state = HandlerState::Decoding;
        let (request, options) = match self.decode(&bytes) {
            Ok(decoded) => decoded,
            Err(e) => return self.fail(e.into(), &mut writer),
        };
        log::debug!(
            "request: {} files, {} to generate",
            request.proto_file.len(),
            request.file_to_generate.len()
        );

        self.state = HandlerState::Translating;
        let targets = match targets(&request) {
            Ok(targets) => targets,
            Err(e) => return self.fail(e.into(), &mut writer),
        };
        let skeletons: Vec<_> = request.proto_file.iter().map(file_skeleton).collect();
        let context = GeneratorContext {
            symbols: SymbolTable::build(&skeletons),
            options,
        };
        let results: Vec<(&str, Result<Vec<GeneratedFile>, GenerateError>)> = targets
            .par_iter()
            .map(|fd| (fd.name(), self.generator.generate(fd, &context)))
            .collect();

        let mut outcome = Outcome::default();
        let mut files = Vec::new();
        for (name, result) in results {
            match result {
                Ok(generated) => {
                    outcome.generated.extend(generated.iter().map(|f| f.name.clone()));
                    files.extend(generated.into_iter().map(Into::into));
                }
                Err(source) if options.strict => {
                    let err = PluginError::Strict {
                        file: name.to_string(),
                        source,
                    };
                    return self.fail(err, &mut writer);
                }
                Err(e) => {
                    log::warn!("{name}: {e}");
                    outcome.failed.push(name.to_string());
                    let report = GeneratedFile {
                        name: format!("{name}.error"),
                        content: format!("{e}\n"),
                    };
                    outcome.generated.push(report.name.clone());
                    files.push(report.into());
                }
            }
        }

        self.state = HandlerState::Encoding;
        let response = CodeGeneratorResponse {
            file: files,
            supported_features: Some(Feature::Proto3Optional as u64),
            ..Default::default()
        };
        if let Err(e) = write_response(&response, &mut writer) {
            self.state = HandlerState::Failed;
            return Err(e.into());
        }

        self.state = HandlerState::Done;
        log::debug!(
            "generated {} files, {} failed",
            outcome.generated.len(),
            outcome.failed.len()
        );
        Ok(outcome)
    }

    fn decode(&self, bytes: &[u8]) -> Result<(CodeGeneratorRequest, PluginOptions), DecodeError> {
        let request = decode_request(bytes)?;
        let options = self.options.with_parameter(request.parameter())?;
        Ok((request, options))
    }

    /// Report `err` as the response's top-level error and stop.
    fn fail<W: Write>(&mut self, err: PluginError, writer: &mut W) -> Result<Outcome, PluginError> {
        self.state = HandlerState::Failed;
        log::error!("{err}");
        let response = CodeGeneratorResponse {
            error: Some(err.to_string()),
            supported_features: Some(Feature::Proto3Optional as u64),
            ..Default::default()
        };
        write_response(&response, writer)?;
        Err(err)
    }
}

/// Requested descriptors in `file_to_generate` order.
fn targets(request: &CodeGeneratorRequest) -> Result<Vec<&FileDescriptorProto>, DecodeError> {
    let by_name: HashMap<&str, &FileDescriptorProto> =
        request.proto_file.iter().map(|fd| (fd.name(), fd)).collect();
    request
        .file_to_generate
        .iter()
        .map(|name| {
            by_name
                .get(name.as_str())
                .copied()
                .ok_or_else(|| DecodeError::MissingFile { name: name.clone() })
        })
        .collect()
}

fn write_response<W: Write>(response: &CodeGeneratorResponse, writer: &mut W) -> std::io::Result<()> {
    writer.write_all(&response.encode_to_vec())?;
    writer.flush()
}
