use std::path::PathBuf;

use blockduel_engine::GameConfig;

use crate::util::{self, Output};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct ShowConfigArg {
    /// Configuration file to validate and print with defaults filled in
    #[arg(long)]
    config: Option<PathBuf>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &ShowConfigArg) -> anyhow::Result<()> {
    let ShowConfigArg { config, output } = arg;
    let config = match config {
        Some(path) => util::read_config_file(path)?,
        None => GameConfig::default(),
    };
    Output::save_json(&config, output.clone())?;
    Ok(())
}
