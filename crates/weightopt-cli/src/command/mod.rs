use clap::{Parser, Subcommand};

use self::{default_config::DefaultConfigArg, evolve::EvolveArg, sample::SampleArg};

mod default_config;
mod evolve;
mod sample;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Evolve grade weights, printing the best solution every generation
    Evolve(#[clap(flatten)] EvolveArg),
    /// Draw weight vectors that satisfy the course limits
    Sample(#[clap(flatten)] SampleArg),
    /// Write the default optimizer config as JSON
    DefaultConfig(#[clap(flatten)] DefaultConfigArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode.unwrap_or(Mode::Evolve(EvolveArg::default())) {
        Mode::Evolve(arg) => evolve::run(&arg)?,
        Mode::Sample(arg) => sample::run(&arg)?,
        Mode::DefaultConfig(arg) => default_config::run(&arg)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;

    use super::*;

    #[test]
    fn test_cli_definition() {
        CommandArgs::command().debug_assert();
    }

    #[test]
    fn test_parse_evolve_options() {
        let args = CommandArgs::try_parse_from([
            "weightopt",
            "evolve",
            "--seed",
            "7",
            "--population-size",
            "50",
            "--max-generations",
            "10",
        ])
        .unwrap();
        assert!(matches!(args.mode, Some(Mode::Evolve(_))));
    }

    #[test]
    fn test_no_subcommand_is_accepted() {
        let args = CommandArgs::try_parse_from(["weightopt"]).unwrap();
        assert!(args.mode.is_none());
    }
}
