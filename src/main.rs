mod app;
mod cli;
mod config;
mod datasources;
mod error;
mod logic;
mod models;
mod store;

use app::App;
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use error::Result;
use logic::{priority_alerts, ResolvedWeather, WeatherSyncService};
use store::TreeStore;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // RUST_LOG wins over -v
    let default_filter = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Some(Commands::Init) = cli.command {
        Config::setup_interactive()?;
        return Ok(());
    }

    let config = if Config::exists(cli.config.as_ref()) {
        match Config::load(cli.config.clone()) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Configuration error: {}", e);
                std::process::exit(1);
            }
        }
    } else if cli.config.is_some() {
        eprintln!("Config file not found: {:?}", cli.config);
        std::process::exit(1);
    } else {
        tracing::warn!("No config.yaml found, using defaults. Run `lsms init` to create one.");
        Config::default()
    };

    if let Err(e) = config.validate() {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    }

    let store = TreeStore::new(config.trees_path(cli.trees.as_ref())?);
    let weather_sync = WeatherSyncService::new(&config);

    if let Some(Commands::Check) = cli.command {
        return run_check(&config, &store, &weather_sync).await;
    }

    let mut app = App::new(config, store)?;
    if let Some(model) = cli.model {
        app.set_model(model);
    }
    if let Some(n) = cli.top {
        app.set_top_n(n);
    }

    let resolved = weather_sync.resolve().await;
    app.set_weather(resolved.snapshot.clone());

    match cli.command.unwrap_or(Commands::Score { save: false }) {
        Commands::Init | Commands::Check => {}
        Commands::Score { save } => {
            print_board(&app, &resolved);
            if save {
                let count = app.save()?;
                println!();
                println!("Saved {} trees to {}", count, app.store().path().display());
            }
        }
        Commands::Explain { id } => {
            println!("{}", app.explain(&id)?);
        }
        Commands::Test {
            id,
            wind,
            rain,
            snow,
            month,
        } => {
            let weather = resolved
                .snapshot
                .clone()
                .with_overrides(wind, rain, snow, month);
            println!("Hypothetical weather: {}", weather.pinned());
            println!();
            let (result, explanation) = app.test_tree(&id, &weather)?;
            match explanation {
                Some(explanation) => println!("{}", explanation),
                None => println!(
                    "{} is not scored for fall risk (canopy trees of 5m or more only) → {}",
                    id, result.level
                ),
            }
        }
        Commands::Summary => print_summary(&app, &resolved),
    }

    Ok(())
}

async fn run_check(
    config: &Config,
    store: &TreeStore,
    weather_sync: &WeatherSyncService,
) -> Result<()> {
    println!("Configuration: OK");
    println!("  Model: {}", config.risk.model);
    println!("  Alert board size: {}", config.risk.top_n);

    match store.load() {
        Ok(trees) => {
            let candidates = trees.iter().filter(|t| t.is_risk_candidate()).count();
            println!(
                "Inventory: {} trees ({} risk candidates) at {}",
                trees.len(),
                candidates,
                store.path().display()
            );
        }
        Err(e) => println!("Inventory: FAILED - {}", e),
    }

    match weather_sync.check_connection().await {
        Some(true) => println!("OpenWeatherMap: OK"),
        Some(false) => println!("OpenWeatherMap: OFFLINE (falling back to configured snapshot)"),
        None => println!("OpenWeatherMap: not configured"),
    }

    let offline = weather_sync.offline();
    println!("Fallback weather: {} ({})", offline.snapshot.pinned(), offline.source);

    Ok(())
}

fn print_header(app: &App, resolved: &ResolvedWeather) {
    println!("Weather: {} [{}]", app.weather().pinned(), resolved.source);
    println!("Model: {}", app.composer().model().name());
    println!();
}

fn print_board(app: &App, resolved: &ResolvedWeather) {
    print_header(app, resolved);

    let ranked = app.top_alerts();
    if ranked.is_empty() {
        println!("No trees in inventory");
        return;
    }

    println!("TOP {} fall-risk trees", app.top_n());
    println!(
        "{:>3}  {:<10} {:<12} {:<8} {:>5} {:>5} {:>5}  Level",
        "#", "ID", "Species", "Zone", "Base", "Wx", "Risk"
    );
    for row in &ranked {
        let t = row.tree;
        println!(
            "{:>3}  {:<10} {:<12} {:<8} {:>5} {:>5} {:>5}  {} {}",
            row.rank,
            t.id,
            t.species,
            t.zone.as_deref().unwrap_or("-"),
            t.risk_base,
            t.risk_weather,
            t.risk_instant,
            t.risk_level.symbol(),
            t.risk_level
        );
    }

    let priority = priority_alerts(&ranked);
    println!();
    if priority.is_empty() {
        println!("No priority alerts");
    } else {
        let ids: Vec<&str> = priority.iter().map(|r| r.tree.id.as_str()).collect();
        println!("Priority alerts ({}): {}", priority.len(), ids.join(", "));
    }
}

fn print_summary(app: &App, resolved: &ResolvedWeather) {
    print_header(app, resolved);

    let counts = app.level_counts();
    println!(
        "{} trees: HIGH {} · MID {} · LOW {}",
        counts.total(),
        counts.high,
        counts.mid,
        counts.low
    );
    println!();

    println!("{:<10} {:>6} {:>8} {:>5}", "Zone", "Trees", "Average", "Max");
    for zone in app.zone_summary() {
        println!(
            "{:<10} {:>6} {:>8.1} {:>5}",
            zone.zone, zone.trees, zone.average, zone.max
        );
    }
}
