mod commands;
mod files;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{msg2proto::Msg2ProtoArgs, proto2msg::Proto2MsgArgs};

#[derive(Parser)]
#[command(name = "protoros", about = "Convert between .proto and ROS .msg files")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate every .msg file of a directory into .proto files
    Msg2proto(Msg2ProtoArgs),
    /// Translate every .proto file of a directory into .msg files (runs protoc)
    Proto2msg(Proto2MsgArgs),
}

fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter(None, log::LevelFilter::Info)
        .parse_default_env()
        .init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Msg2proto(args) => args.run(),
        Commands::Proto2msg(args) => args.run(),
    }
}
