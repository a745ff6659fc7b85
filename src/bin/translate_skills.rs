//! Fill missing Vietnamese skill names from their Chinese originals through
//! an injected Hán-Việt dictionary, ahead of reconciliation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use reconcile_lib::models::skill::SkillCandidate;
use reconcile_lib::translate::HanVietTable;
use reconcile_lib::utils::env::load_env;

#[derive(Parser)]
#[command(
    name = "translate_skills",
    about = "Fill missing Vietnamese skill names via a Hán-Việt dictionary"
)]
struct Cli {
    /// Skill candidate JSON to translate
    input: PathBuf,
    /// Hán-Việt dictionary JSON ({"曹": "Tào", ...})
    #[arg(long)]
    dict: PathBuf,
    /// Where to write the result (defaults to overwriting the input)
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    load_env();

    let cli = Cli::parse();
    let table = HanVietTable::from_json_file(&cli.dict)?;

    let raw = std::fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read input {}", cli.input.display()))?;
    let mut skills: Vec<SkillCandidate> = serde_json::from_str(&raw)
        .with_context(|| format!("input {} is not a skill candidate list", cli.input.display()))?;

    let mut filled = 0;
    let mut gaps = Vec::new();
    for skill in &mut skills {
        if !skill.name.vi.trim().is_empty() {
            continue;
        }
        let Some(cn) = skill.name.cn.as_deref().map(str::trim).filter(|s| !s.is_empty()) else {
            continue;
        };
        skill.name.vi = table.transliterate(cn);
        filled += 1;
        if !table.covers(cn) {
            gaps.push(skill.name.vi.clone());
        }
    }

    let output = cli.output.unwrap_or(cli.input);
    let rendered = serde_json::to_string_pretty(&skills).context("failed to serialize skills")?;
    std::fs::write(&output, rendered)
        .with_context(|| format!("failed to write {}", output.display()))?;

    info!("filled {filled} Vietnamese names, wrote {}", output.display());
    println!("Translated {} of {} skills", filled, skills.len());
    if !gaps.is_empty() {
        warn!("{} names contain characters missing from the dictionary", gaps.len());
        println!("Names with dictionary gaps (bracketed characters need entries):");
        for name in gaps.iter().take(20) {
            println!("  - {name}");
        }
        if gaps.len() > 20 {
            println!("  ... and {} more", gaps.len() - 20);
        }
    }
    Ok(())
}
