use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use uuid::Uuid;

use reconcile_lib::matching::MatcherConfig;
use reconcile_lib::merge::NewIdSource;
use reconcile_lib::models::general::GeneralCandidate;
use reconcile_lib::models::skill::SkillCandidate;
use reconcile_lib::reconcile::{reconcile_generals, reconcile_skills};
use reconcile_lib::store;
use reconcile_lib::utils::env::load_env;

#[derive(Parser)]
#[command(
    name = "reconcile",
    about = "Reconcile extracted or scraped records against the canonical store"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Reconcile extracted general records, linking innate skills
    Generals {
        /// Candidate JSON produced by extraction or scraping
        #[arg(long)]
        input: PathBuf,
        /// Canonical generals store file
        #[arg(long)]
        generals: PathBuf,
        /// Canonical skills store file, for innate-skill linking
        #[arg(long)]
        skills: Option<PathBuf>,
        /// Report what would change without writing the store
        #[arg(long)]
        dry_run: bool,
        /// Use the Chinese name as the id for created records
        #[arg(long)]
        id_from_secondary: bool,
    },
    /// Reconcile scraped skill records
    Skills {
        /// Candidate JSON produced by scraping
        #[arg(long)]
        input: PathBuf,
        /// Canonical skills store file
        #[arg(long)]
        skills: PathBuf,
        /// Report what would change without writing the store
        #[arg(long)]
        dry_run: bool,
        /// Use the Chinese name as the id for created records
        #[arg(long)]
        id_from_secondary: bool,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    load_env();

    let cli = Cli::parse();
    let run_id = Uuid::new_v4();
    let started = Instant::now();
    info!("starting reconciliation run {run_id}");

    let pb = phase_bar();
    match cli.command {
        Command::Generals {
            input,
            generals,
            skills,
            dry_run,
            id_from_secondary,
        } => run_generals(&pb, input, generals, skills, dry_run, id_source(id_from_secondary))?,
        Command::Skills {
            input,
            skills,
            dry_run,
            id_from_secondary,
        } => run_skills(&pb, input, skills, dry_run, id_source(id_from_secondary))?,
    }
    pb.finish_with_message("done");

    info!(
        "reconciliation run {run_id} finished in {:.2}s",
        started.elapsed().as_secs_f64()
    );
    Ok(())
}

fn id_source(id_from_secondary: bool) -> NewIdSource {
    if id_from_secondary {
        NewIdSource::SecondaryName
    } else {
        NewIdSource::PrimaryName
    }
}

fn phase_bar() -> ProgressBar {
    let pb = ProgressBar::new(4);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("█▉▊▋▌▍▎▏  "),
    );
    pb
}

fn run_generals(
    pb: &ProgressBar,
    input: PathBuf,
    generals_path: PathBuf,
    skills_path: Option<PathBuf>,
    dry_run: bool,
    id_source: NewIdSource,
) -> Result<()> {
    pb.set_message("loading candidates and stores");
    let raw = std::fs::read_to_string(&input)
        .with_context(|| format!("failed to read input {}", input.display()))?;
    let candidates: Vec<GeneralCandidate> = serde_json::from_str(&raw)
        .with_context(|| format!("input {} is not a candidate list", input.display()))?;
    let mut generals = store::load_generals(&generals_path)?;
    let skills = match &skills_path {
        Some(path) => store::load_skills(path)?,
        None => Vec::new(),
    };
    info!(
        "loaded {} candidates, {} canonical generals, {} canonical skills",
        candidates.len(),
        generals.len(),
        skills.len()
    );
    pb.inc(1);

    pb.set_message("reconciling");
    let config = MatcherConfig::default();
    let outcome = reconcile_generals(&candidates, &generals, &skills, &config, id_source);
    pb.inc(1);

    pb.set_message(if dry_run { "dry run, skipping apply" } else { "applying operations" });
    if dry_run {
        println!("DRY RUN - no changes will be made");
        println!("{} operations pending", outcome.operations.len());
    } else {
        let (created, updated) = store::apply_general_operations(&mut generals, outcome.operations);
        store::save_generals(&generals_path, &generals)?;
        info!("applied {created} creates and {updated} updates to {}", generals_path.display());
    }
    pb.inc(1);

    pb.set_message("reporting");
    print!("{}", outcome.report);
    pb.inc(1);
    Ok(())
}

fn run_skills(
    pb: &ProgressBar,
    input: PathBuf,
    skills_path: PathBuf,
    dry_run: bool,
    id_source: NewIdSource,
) -> Result<()> {
    pb.set_message("loading candidates and store");
    let raw = std::fs::read_to_string(&input)
        .with_context(|| format!("failed to read input {}", input.display()))?;
    let candidates: Vec<SkillCandidate> = serde_json::from_str(&raw)
        .with_context(|| format!("input {} is not a candidate list", input.display()))?;
    let mut skills = store::load_skills(&skills_path)?;
    info!(
        "loaded {} candidates against {} canonical skills",
        candidates.len(),
        skills.len()
    );
    pb.inc(1);

    pb.set_message("reconciling");
    let config = MatcherConfig::default();
    let outcome = reconcile_skills(&candidates, &skills, &config, id_source);
    pb.inc(1);

    pb.set_message(if dry_run { "dry run, skipping apply" } else { "applying operations" });
    if dry_run {
        println!("DRY RUN - no changes will be made");
        println!("{} operations pending", outcome.operations.len());
    } else {
        let (created, updated) = store::apply_skill_operations(&mut skills, outcome.operations);
        store::save_skills(&skills_path, &skills)?;
        info!("applied {created} creates and {updated} updates to {}", skills_path.display());
    }
    pb.inc(1);

    pb.set_message("reporting");
    print!("{}", outcome.report);
    pb.inc(1);
    Ok(())
}
