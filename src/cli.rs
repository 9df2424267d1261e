use crate::logic::RiskModelKind;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lsms", version, about = "Tree fall-risk scoring for managed landscapes")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to config.yaml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the tree inventory file
    #[arg(short, long, global = true)]
    pub trees: Option<PathBuf>,

    /// Alert board size
    #[arg(long, global = true)]
    pub top: Option<usize>,

    /// Scoring model (additive or multiplicative)
    #[arg(short, long, global = true, value_parser = parse_model)]
    pub model: Option<RiskModelKind>,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Re-run interactive setup
    Init,
    /// Validate config, inventory and weather connection
    Check,
    /// Score every tree and show the alert board (default)
    Score {
        /// Write recomputed scores back to the inventory
        #[arg(long)]
        save: bool,
    },
    /// Explain how a tree's current score was derived
    Explain {
        /// Tree id
        id: String,
    },
    /// Score one tree under hypothetical weather without saving
    Test {
        /// Tree id
        id: String,
        /// Peak wind (m/s)
        #[arg(long)]
        wind: Option<f64>,
        /// 3-day rain (mm)
        #[arg(long)]
        rain: Option<f64>,
        /// Snow depth (cm)
        #[arg(long)]
        snow: Option<f64>,
        /// Month (1-12)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,
    },
    /// Level counts and per-zone average risk
    Summary,
}

fn parse_model(s: &str) -> Result<RiskModelKind, String> {
    RiskModelKind::from_str(s)
        .ok_or_else(|| format!("unknown model '{}' (expected additive or multiplicative)", s))
}
