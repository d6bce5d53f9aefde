use std::path::PathBuf;

use weightopt_engine::population::Population;

use crate::{
    schema::result::SampledWeights,
    util::{ConfigArg, Output},
};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct SampleArg {
    #[clap(flatten)]
    config: ConfigArg,
    /// Number of weight vectors to draw
    #[arg(long, default_value_t = 10)]
    count: usize,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &SampleArg) -> anyhow::Result<()> {
    let config = arg.config.load()?;
    let mut rng = arg.config.rng();
    let population =
        Population::create_first_generation(config.course, arg.count, config.mutation_rate, &mut rng)?;
    let samples = population
        .members()
        .iter()
        .map(SampledWeights::from)
        .collect::<Vec<_>>();
    Output::save_json(&samples, arg.output.clone())?;

    eprintln!("Drew {} weight vectors", samples.len());
    Ok(())
}
