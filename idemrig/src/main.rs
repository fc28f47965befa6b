use clap::{Parser, ValueEnum};
use idemrig_core::{
    Algebra, AlgebraTables, Configuration, FormalRig, InvariantViolation, PartitionStore,
    Presentation, Quotient, Strategy, TWO_GENERATORS, monomial_table, run, write_listing,
};
use std::{
    fs,
    io::{self, BufWriter},
    num::NonZeroUsize,
    path::{Path, PathBuf},
    process::ExitCode,
};
use tracing::{Level, error, info, warn};

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Tables {
    /// Materialize the multiplication and addition tables up front (about 1 GiB).
    Dense,
    /// Compute products and sums from the monomial rule when needed.
    OnDemand,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Refinement {
    Worklist,
    Exhaustive,
}

impl From<Refinement> for Strategy {
    fn from(refinement: Refinement) -> Self {
        match refinement {
            Refinement::Worklist => Strategy::Worklist,
            Refinement::Exhaustive => Strategy::Exhaustive,
        }
    }
}

/// List the elements of the free idempotent rig on two generators.
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Output file, stdout is used if it cannot be created.
    #[arg(short, long, value_name = "FILE", default_value = "IdempotentRig.txt")]
    output: PathBuf,

    #[arg(long, value_enum, default_value_t = Tables::Dense)]
    tables: Tables,

    #[arg(long, value_enum, default_value_t = Refinement::Worklist)]
    strategy: Refinement,

    /// Rewrite the output file after every N merges.
    #[arg(long, value_name = "N")]
    checkpoint_every: Option<NonZeroUsize>,

    /// Print the monomial multiplication table before starting.
    #[arg(long)]
    print_table: bool,

    /// More logging, repeat for more.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors.
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match (cli.quiet, cli.verbose) {
        (true, _) => Level::ERROR,
        (false, 0) => Level::INFO,
        (false, 1) => Level::DEBUG,
        (false, _) => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    let presentation = TWO_GENERATORS;
    if cli.print_table {
        println!("{}", monomial_table(&presentation));
    }

    let config = Configuration {
        strategy: cli.strategy.into(),
        certify: true,
    };
    let quotient = match cli.tables {
        Tables::Dense => solve(&AlgebraTables::build(&presentation), &presentation, &cli, &config),
        Tables::OnDemand => solve(&FormalRig::new(presentation.clone()), &presentation, &cli, &config),
    };
    let Some(quotient) = quotient else {
        return ExitCode::FAILURE;
    };

    info!("we now have {} equivalence classes", quotient.len());
    match emit(&cli.output, &quotient, &presentation) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("writing the listing failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn solve<A: Algebra, const N: usize>(
    algebra: &A,
    presentation: &Presentation<N>,
    cli: &Cli,
    config: &Configuration,
) -> Option<Quotient> {
    let mut merges = 0;
    let checkpoint = |store: &PartitionStore| {
        merges += 1;
        let Some(every) = cli.checkpoint_every else {
            return;
        };
        if merges % every.get() == 0 {
            info!(merges, classes = store.len(), "checkpoint");
            if let Err(err) = emit(&cli.output, &Quotient::from_store(store), presentation) {
                warn!("checkpoint failed: {err}");
            }
        }
    };
    match run(algebra, config, checkpoint) {
        Ok((quotient, stats)) => {
            info!(
                seeded = stats.seeded_classes,
                merges = stats.merges,
                "closure finished"
            );
            Some(quotient)
        }
        Err(err @ InvariantViolation::NotCongruent { .. }) => {
            error!("stable partition is not a congruence: {err}");
            None
        }
        Err(err) => {
            error!("seeding produced a broken partition: {err}");
            None
        }
    }
}

/// Write the listing to `path`, or to stdout if `path` cannot be created.
fn emit<const N: usize>(
    path: &Path,
    quotient: &Quotient,
    presentation: &Presentation<N>,
) -> io::Result<()> {
    match fs::File::create(path) {
        Ok(file) => write_listing(&mut BufWriter::new(file), quotient, presentation),
        Err(err) => {
            warn!(
                "error opening output file {} to write ({err}), sending output to stdout",
                path.display()
            );
            write_listing(&mut io::stdout().lock(), quotient, presentation)
        }
    }
}
