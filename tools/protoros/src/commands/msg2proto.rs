use std::{fs, path::PathBuf};

use anyhow::{Context, Result, bail};
use clap::Args;
use protoros::{MsgSource, translate_msg_batch};

use crate::files::{ensure_dir, find_files};

#[derive(Args)]
pub struct Msg2ProtoArgs {
    /// Directory containing .msg files
    msg_dir: PathBuf,

    /// Output directory for .proto files
    proto_dir: PathBuf,

    /// Package name for every file (default: the directory of each .msg file)
    #[arg(short, long)]
    package: Option<String>,

    /// Also convert .msg files in subdirectories
    #[arg(short, long)]
    recursive: bool,
}

impl Msg2ProtoArgs {
    pub fn run(self) -> Result<()> {
        let paths = find_files(&self.msg_dir, "msg", self.recursive)?;
        ensure_dir(&self.proto_dir)?;

        let sources = paths
            .iter()
            .map(|path| -> Result<MsgSource> {
                let text = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
                Ok(MsgSource::new(path.to_string_lossy(), text))
            })
            .collect::<Result<Vec<_>>>()?;

        let batch = translate_msg_batch(&sources, self.package.as_deref());
        for output in batch.outputs() {
            let path = self.proto_dir.join(&output.file_name);
            log::info!("Generating: {}", path.display());
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, &output.text).with_context(|| format!("failed to write {}", path.display()))?;
        }

        let failed = batch.failures().count();
        if failed > 0 {
            for (source, err) in batch.failures() {
                log::error!("{source}: {err}");
            }
            bail!("{failed} of {} files failed to convert", sources.len());
        }
        Ok(())
    }
}
