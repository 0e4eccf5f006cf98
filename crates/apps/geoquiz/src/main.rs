//! `geoquiz`: plays headless quiz sessions against a dataset directory and
//! inspects or re-hashes dataset manifests.

mod config;
mod error;
mod session;

use std::path::{Path, PathBuf};
use std::rc::Rc;

use clap::{Parser, Subcommand};
use formats::{Dataset, DetailLevel, Difficulty};
use quiz::{QuestionSet, DEFAULT_QUESTION_COUNT};
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::session::{Player, Session, SessionSummary, Strategy};

#[derive(Parser)]
#[command(name = "geoquiz")]
#[command(about = "Headless geography quiz on an orthographic globe")]
struct Cli {
    /// Dataset directory containing dataset.manifest.json
    #[arg(long, global = true, env = "GEOQUIZ_DATA", default_value = "data")]
    data: PathBuf,

    /// JSON file with globe, scoring and session settings
    #[arg(long, global = true, env = "GEOQUIZ_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Play one session with a scripted player and print the results
    Play {
        /// Number of questions
        #[arg(short = 'n', long, default_value_t = DEFAULT_QUESTION_COUNT)]
        questions: usize,

        /// Restrict questions to a difficulty tier (easy, normal, hard)
        #[arg(long)]
        tier: Option<Difficulty>,

        /// Seed for question sampling and the player (random if omitted)
        #[arg(long)]
        seed: Option<u64>,

        #[arg(long, value_enum, default_value_t = Strategy::Centroid)]
        strategy: Strategy,

        /// Print the session summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print dataset statistics
    Inspect,

    /// Recompute the content hash of every file named in the manifest
    Hash,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = real_main(Cli::parse()) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main(cli: Cli) -> Result<(), AppError> {
    match cli.command {
        Command::Play {
            questions,
            tier,
            seed,
            strategy,
            json,
        } => {
            let config = AppConfig::load(cli.config.as_deref())?;
            let dataset = Rc::new(formats::load_dataset_dir(&cli.data)?);
            let seed = seed.unwrap_or_else(rand::random);
            let set = QuestionSet::seeded(&dataset, questions, tier, seed)?;
            let player = Player::new(strategy, seed.wrapping_add(1));

            let summary = Session::new(config, dataset, set, player).play()?;
            if json {
                let payload = serde_json::to_string_pretty(&summary).map_err(AppError::Output)?;
                println!("{payload}");
            } else {
                print_summary(&summary, seed);
            }
            Ok(())
        }
        Command::Inspect => {
            let dataset = formats::load_dataset_dir(&cli.data)?;
            print_inspection(&cli.data, &dataset);
            Ok(())
        }
        Command::Hash => {
            let manifest = formats::write_content_hashes(&cli.data)?;
            for entry in manifest.entries() {
                println!(
                    "{}  {}",
                    entry.content_hash.as_deref().unwrap_or("-"),
                    entry.path
                );
            }
            Ok(())
        }
    }
}

fn print_summary(summary: &SessionSummary, seed: u64) {
    println!("seed {seed}");
    for r in &summary.rounds {
        let answer = match (&r.clicked_name, r.point) {
            (Some(name), _) => name.clone(),
            (None, Some(_)) => "ocean".to_string(),
            (None, None) => "timeout".to_string(),
        };
        let distance = r
            .distance_km
            .map(|km| format!("{km:.0} km"))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:>3}. {:<32} {:<32} {:>9}  {:>3} + {:>3} + {:>2} = {:>3}",
            r.round,
            r.name,
            answer,
            distance,
            r.score.accuracy,
            r.score.proximity,
            r.score.adjacency,
            r.score.total
        );
    }
    println!(
        "total {}/{}  correct {}/{}  draws {} (avg {:.2} ms)",
        summary.total,
        summary.max_total,
        summary.correct,
        summary.rounds.len(),
        summary.draws,
        summary.average_draw_ms
    );
}

fn print_inspection(root: &Path, dataset: &Dataset) {
    println!("dataset {}", root.display());
    for level in [DetailLevel::Low, DetailLevel::High] {
        let set = dataset.detail(level);
        println!(
            "  {level:?}: {} countries, {} rivers, {} lakes",
            set.countries.len(),
            set.rivers.len(),
            set.lakes.len()
        );
    }
    let eligible = dataset.eligible();
    let missing = eligible
        .iter()
        .filter(|id| !dataset.adjacency().contains(**id))
        .count();
    println!("  eligible: {}", eligible.len());
    println!(
        "  adjacency: {} entries, {missing} eligible countries without one",
        dataset.adjacency().len()
    );
    if dataset.has_tiers() {
        for tier in [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard] {
            println!("  tier {tier}: {}", dataset.pool(Some(tier)).len());
        }
    }
}
