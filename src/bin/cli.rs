//! Painel CLI
//!
//! Command-line tools around the dashboard:
//! - Validate a metrics document
//! - Fetch and validate the served document
//! - Run the oracle summary once
//! - Generate a default config file

use clap::{Parser, Subcommand};
use painel::config::{generate_default_config, Config};
use painel::oracle::{Oracle, OracleSummary};
use painel_core::{ids, DashboardView, MetricsDocument, NumberLocale};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "painel-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Tools for the Painel Search Console dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a metrics document and show what the dashboard would display
    Validate {
        /// Path to the JSON document
        file: PathBuf,
    },

    /// Fetch the served metrics document and validate it
    Fetch {
        /// Document URL
        #[arg(long, default_value = "http://localhost:8084/dados_oraculares.json")]
        url: String,
        /// Save the validated document here
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run the oracle summary once
    Summary {
        /// Don't append to the history file
        #[arg(long)]
        dry_run: bool,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { file } => {
            let text = std::fs::read_to_string(&file)?;
            match MetricsDocument::from_json(&text) {
                Ok(doc) => print_document(&doc, &cli.format)?,
                Err(e) => {
                    eprintln!("{:?} is not a valid metrics document: {}", file, e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Fetch { url, output } => {
            let response = match reqwest::get(&url).await {
                Ok(response) => response,
                Err(e) => {
                    eprintln!("Cannot reach {}", url);
                    eprintln!("Error: {}", e);
                    eprintln!();
                    eprintln!("Make sure the Painel server is running:");
                    eprintln!("  cargo run --bin painel");
                    std::process::exit(1);
                }
            };

            if !response.status().is_success() {
                eprintln!("Failed to fetch {}: HTTP {}", url, response.status().as_u16());
                std::process::exit(1);
            }

            let text = response.text().await?;
            let doc = match MetricsDocument::from_json(&text) {
                Ok(doc) => doc,
                Err(e) => {
                    eprintln!("{} did not return a valid metrics document: {}", url, e);
                    std::process::exit(1);
                }
            };

            print_document(&doc, &cli.format)?;

            if let Some(path) = output {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(&path, doc.to_json_pretty()?)?;
                println!("Document written to {:?}", path);
            }
        }

        Commands::Summary { dry_run } => {
            let config = load_config(cli.config.as_deref())?;
            let oracle = Oracle::new(&config.oracle);

            let summary = if dry_run {
                oracle.summarize().await?
            } else {
                oracle.consult().await?
            };

            match cli.format.as_str() {
                "json" => println!("{}", serde_json::to_string_pretty(&summary)?),
                _ => print_summary(&summary),
            }

            if !dry_run {
                println!();
                println!("Recorded in {:?}", oracle.history().path());
            }
        }

        Commands::Config { output } => {
            let config = generate_default_config();

            match output {
                Some(path) => {
                    // Create parent directory if needed
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &config)?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
        }
    }

    Ok(())
}

fn load_config(path: Option<&std::path::Path>) -> Result<Config, Box<dyn std::error::Error>> {
    Ok(match path {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default()?,
    })
}

fn print_document(doc: &MetricsDocument, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    if format == "json" {
        let summary = serde_json::json!({
            "valid": true,
            "period": { "start": doc.meta.period.start, "end": doc.meta.period.end },
            "countries": doc.countries.len(),
            "buckets": doc.series.len(),
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    let view = DashboardView::derive(doc, &NumberLocale::default());
    let text = |id: &'static str| view.text(id).unwrap_or("-").to_string();

    println!("Período:       {}", text(ids::PERIOD));
    println!("Atualizado em: {}", text(ids::LAST_UPDATE));
    println!();
    println!("{:<12} {:>12}  {}", "KPI", "Valor", "Variação");
    println!("{}", "-".repeat(48));
    for (label, value_id, delta_id) in [
        ("Impressões", ids::KPI_IMPRESSIONS, ids::DELTA_IMPRESSIONS),
        ("Cliques", ids::KPI_CLICKS, ids::DELTA_CLICKS),
        ("CTR", ids::KPI_CTR, ids::DELTA_CTR),
        ("Posição", ids::KPI_POSITION, ids::DELTA_POSITION),
    ] {
        println!("{:<12} {:>12}  {}", label, text(value_id), text(delta_id));
    }

    println!();
    println!("{:<16} {:>12} {:>10} {:>8}", "País", "Impressões", "Cliques", "CTR");
    println!("{}", "-".repeat(49));
    for row in &view.countries {
        let [name, impressions, clicks, ctr] = row.cells();
        println!("{:<16} {:>12} {:>10} {:>8}", name, impressions, clicks, ctr);
    }

    println!();
    println!("{} buckets in series", doc.series.len());
    Ok(())
}

fn print_summary(summary: &OracleSummary) {
    println!("Período:        {}", summary.period);
    println!("Impressões:     {}", summary.impressions);
    println!("Cliques:        {}", summary.clicks);
    println!("CTR médio:      {:.2}%", summary.ctr);
    println!("Posição média:  {}", summary.avg_position);
    println!();
    println!("{:<12} {:>12} {:>10} {:>8}", "País", "Impressões", "Cliques", "CTR");
    println!("{}", "-".repeat(45));
    for country in &summary.countries {
        println!(
            "{:<12} {:>12} {:>10} {:>7.2}%",
            country.name, country.impressions, country.clicks, country.ctr
        );
    }
}
