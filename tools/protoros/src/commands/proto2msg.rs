use std::{env, path::PathBuf, process::Command};

use anyhow::{Context, Result, bail};
use clap::Args;

use crate::files::{ensure_dir, find_files};

const PLUGIN_NAME: &str = "protoc-gen-msg";

#[derive(Args)]
pub struct Proto2MsgArgs {
    /// Directory containing .proto files (also the protoc include path)
    proto_dir: PathBuf,

    /// Output directory for .msg files
    msg_dir: PathBuf,

    /// Also convert .proto files in subdirectories
    #[arg(short, long)]
    recursive: bool,

    /// protoc executable
    #[arg(long, default_value = "protoc")]
    protoc: PathBuf,

    /// protoc-gen-msg executable (default: next to this binary, then PATH)
    #[arg(long)]
    plugin: Option<PathBuf>,

    /// Plugin parameter, e.g. `strict` or `enum_repr=int32`
    #[arg(long)]
    msg_opt: Option<String>,
}

impl Proto2MsgArgs {
    pub fn run(self) -> Result<()> {
        let paths = find_files(&self.proto_dir, "proto", self.recursive)?;
        ensure_dir(&self.msg_dir)?;
        let plugin = self.plugin.clone().or_else(sibling_plugin);

        let mut failed = 0;
        for path in &paths {
            log::info!("Converting: {}", path.display());
            let mut command = Command::new(&self.protoc);
            command
                .arg(format!("--proto_path={}", self.proto_dir.display()))
                .arg(format!("--msg_out={}", self.msg_dir.display()));
            if let Some(plugin) = &plugin {
                command.arg(format!("--plugin={PLUGIN_NAME}={}", plugin.display()));
            }
            if let Some(opt) = &self.msg_opt {
                command.arg(format!("--msg_opt={opt}"));
            }
            command.arg(path);

            let status = command
                .status()
                .with_context(|| format!("failed to run {}", self.protoc.display()))?;
            if !status.success() {
                log::error!("protoc failed on {} ({status})", path.display());
                failed += 1;
            }
        }

        if failed > 0 {
            bail!("{failed} of {} files failed to convert", paths.len());
        }
        Ok(())
    }
}

/// `protoc-gen-msg` installed next to the running binary, if any.
fn sibling_plugin() -> Option<PathBuf> {
    let exe = env::current_exe().ok()?;
    let plugin = exe.with_file_name(format!("{PLUGIN_NAME}{}", env::consts::EXE_SUFFIX));
    plugin.is_file().then_some(plugin)
}
