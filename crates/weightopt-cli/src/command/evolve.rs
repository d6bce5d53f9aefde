use std::{
    io::{self, Write},
    path::PathBuf,
};

use anyhow::Context as _;
use chrono::Utc;
use weightopt_engine::{
    cancellation::CancellationToken,
    candidate::Candidate,
    component::{Component, ComponentMap},
    driver::{GenerationStep, Optimizer},
};
use weightopt_stats::descriptive::DescriptiveStats;

use crate::{
    schema::result::OptimizationResult,
    util::{ConfigArg, Output},
};

const REPORT_PRECISION: usize = 4;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct EvolveArg {
    #[clap(flatten)]
    config: ConfigArg,
    /// Stop after this many generations; runs until Ctrl-C otherwise
    #[arg(long)]
    max_generations: Option<usize>,
    /// Print population statistics to stderr every generation
    #[arg(long)]
    stats: bool,
    /// Write the best weights as JSON to this file when the run stops (also on Ctrl-C)
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &EvolveArg) -> anyhow::Result<()> {
    let token = CancellationToken::new();
    let handler_token = token.clone();
    ctrlc::set_handler(move || handler_token.cancel())
        .context("Failed to install the interrupt handler")?;
    evolve(arg, &token)
}

fn evolve(arg: &EvolveArg, token: &CancellationToken) -> anyhow::Result<()> {
    let config = arg.config.load()?;
    let mut rng = arg.config.rng();

    eprintln!(
        "Creating first generation of {} candidates (mutation rate {})...",
        config.population_size, config.mutation_rate
    );
    let mut optimizer = Optimizer::new(&config, &mut rng)?;

    let mut stdout = io::stdout().lock();
    let mut write_result = Ok(());
    let mut generations = 0;
    let outcome = optimizer.run(&mut rng, token, |step| {
        generations = step.report.generation;
        let report = &step.report;
        if let Err(e) = write_best(
            &mut stdout,
            report.generation,
            &report.best_ever,
            &report.best_of_generation,
        ) {
            write_result = Err(e);
            token.cancel();
            return;
        }
        if arg.stats {
            print_stats(step);
        }
        if arg
            .max_generations
            .is_some_and(|max| step.report.generation >= max)
        {
            token.cancel();
        }
    });
    write_result.context("Failed to write generation report")?;
    let best = match outcome {
        Ok(best) => best,
        Err(err) => {
            write_best(
                &mut stdout,
                err.generation,
                &err.best_ever,
                &err.best_of_generation,
            )
            .context("Failed to write generation report")?;
            return Err(err).context("Evolution stopped");
        }
    };

    let Some(best) = best else {
        eprintln!("Stopped before the first generation");
        return Ok(());
    };

    eprintln!();
    eprintln!("Evolution stopped after {generations} generations");
    eprintln!("  Best: {best:.REPORT_PRECISION$}");

    if let Some(path) = &arg.output {
        let result = OptimizationResult {
            found_at: Utc::now(),
            generations,
            fitness: best.fitness(),
            weights: *best.weights(),
            course: optimizer.population().course().clone(),
        };
        Output::save_json(&result, Some(path.clone()))?;
        eprintln!("  Saved to: {}", path.display());
    }

    Ok(())
}

fn write_best<W>(
    writer: &mut W,
    generation: usize,
    best_ever: &Candidate,
    best_of_generation: &Candidate,
) -> io::Result<()>
where
    W: Write,
{
    writeln!(writer, "Best of ALL TIME: {best_ever:.REPORT_PRECISION$}")?;
    writeln!(
        writer,
        "    Best of generation {generation}: {best_of_generation:.REPORT_PRECISION$}"
    )?;
    Ok(())
}

fn print_stats(step: &GenerationStep) {
    let GenerationStep { report, mutations } = step;
    let fitness = &report.fitness_stats;
    eprintln!("  Generation #{}:", report.generation);
    eprintln!("    Fitness Stats:");
    eprintln!("      Min:  {:.3}", fitness.min);
    eprintln!("      Max:  {:.3}", fitness.max);
    eprintln!("      Mean: {:.3}", fitness.mean);
    eprintln!("    Weights Stats ({}):", component_names());
    eprintln!(
        "      Min:        {:.3?}",
        per_component(&report.weight_stats, |s| s.min)
    );
    eprintln!(
        "      Max:        {:.3?}",
        per_component(&report.weight_stats, |s| s.max)
    );
    eprintln!(
        "      Mean:       {:.3?}",
        per_component(&report.weight_stats, |s| s.mean)
    );
    eprintln!(
        "      NormStddev: {:.3?}",
        per_component(&report.weight_stats, |s| s.normalized_std_dev)
    );
    eprintln!(
        "    Mutations: {} applied, {} abandoned",
        mutations.applied, mutations.abandoned
    );
}

fn component_names() -> String {
    Component::ALL
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn per_component<F>(stats: &ComponentMap<DescriptiveStats>, f: F) -> Vec<f64>
where
    F: Fn(&DescriptiveStats) -> f64,
{
    stats.values().map(f).collect()
}
