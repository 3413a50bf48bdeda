//! `protoc` plugin writing one ROS `.msg` file per message.
//!
//! Usage: `protoc --plugin=protoc-gen-msg --msg_out=<dir> [--msg_opt=strict] file.proto`

use std::{io, process::ExitCode};

use protoros::plugin::{MsgGenerator, PluginHandler, PluginOptions};

fn main() -> ExitCode {
    // stdout carries the response, so logs go to stderr.
    env_logger::Builder::new()
        .filter(None, log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    let mut handler = PluginHandler::new(MsgGenerator, PluginOptions::default());
    match handler.run(io::stdin().lock(), io::stdout().lock()) {
        Ok(outcome) => {
            log::info!(
                "{} files generated, {} failed",
                outcome.generated.len(),
                outcome.failed.len()
            );
            ExitCode::SUCCESS
        }
        Err(_) => ExitCode::FAILURE,
    }
}
