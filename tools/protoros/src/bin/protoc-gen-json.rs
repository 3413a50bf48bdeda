//! `protoc` plugin dumping each file's messages and enums as JSON.
//!
//! Usage: `protoc --plugin=protoc-gen-json --json_out=<dir> file.proto`

use std::{io, process::ExitCode};

use protoros::plugin::{JsonGenerator, PluginHandler, PluginOptions};

fn main() -> ExitCode {
    env_logger::Builder::new()
        .filter(None, log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    let mut handler = PluginHandler::new(JsonGenerator, PluginOptions::default());
    match handler.run(io::stdin().lock(), io::stdout().lock()) {
        Ok(_) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}
