use anyhow::Context;
use clap::Parser;
use heist_simulator::{lookup, DistributionManager, LookupTableBuilder};
use heist_types::GameConfig;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Master seed for the run; the same seed reproduces every table
    /// bit-for-bit.
    #[arg(short, long, default_value_t = 1)]
    seed: u64,

    /// Rounds to simulate per bet mode.
    #[arg(short, long, default_value_t = 100_000)]
    rounds: usize,

    /// Simulate only the named bet mode.
    #[arg(short, long)]
    mode: Option<String>,

    /// Output directory for lookup tables and books.
    #[arg(short, long, default_value = "library")]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    // Parse args
    let args = Args::parse();

    // Create logger
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let config = GameConfig::cosmic_heist();
    let manager =
        DistributionManager::new(&config, args.seed).context("invalid game configuration")?;
    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("failed to create {}", args.out.display()))?;

    info!(
        game = %config.game_id,
        seed = args.seed,
        rounds = args.rounds,
        "starting simulation"
    );

    for bet_mode in &config.bet_modes {
        if let Some(only) = &args.mode {
            if only != &bet_mode.name {
                continue;
            }
        }

        let output = manager
            .run(&bet_mode.name, args.rounds)
            .with_context(|| format!("simulation failed for mode {}", bet_mode.name))?;
        info!(
            mode = %bet_mode.name,
            unweighted_rtp = output.fit.unweighted_rtp,
            realized_rtp = output.fit.realized_rtp,
            target_rtp = output.fit.target_rtp,
            iterations = output.fit.iterations,
            "mode complete"
        );

        let table = LookupTableBuilder::build(&bet_mode.name, &output.records);
        let books = LookupTableBuilder::books(&output.records);

        let table_path = args.out.join(format!("lookup_{}.csv", bet_mode.name));
        let books_path = args.out.join(format!("books_{}.jsonl", bet_mode.name));
        table
            .write_csv(&table_path)
            .with_context(|| format!("failed to write {}", table_path.display()))?;
        lookup::write_books(&books, &books_path)
            .with_context(|| format!("failed to write {}", books_path.display()))?;
        info!(
            mode = %bet_mode.name,
            table = %table_path.display(),
            books = %books_path.display(),
            entries = table.entries.len(),
            "tables written"
        );
    }

    Ok(())
}
