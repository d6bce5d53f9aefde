use std::path::PathBuf;

use weightopt_engine::course::OptimizerConfig;

use crate::util::Output;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct DefaultConfigArg {
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &DefaultConfigArg) -> anyhow::Result<()> {
    Output::save_json(&OptimizerConfig::default(), arg.output.clone())
}
