mod ingredient_categories;

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use grocery_core::{parse_quantity, run_pipeline_with_stats, EngineConfig};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "grocery")]
#[command(about = "Grocery list normalization CLI", long_about = None)]
struct Cli {
    /// Log pipeline stages to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize an upstream grocery payload into a categorized shopping list
    Normalize {
        /// JSON file to read (default: stdin)
        file: Option<PathBuf>,
        /// Pretty-print the output JSON
        #[arg(long)]
        pretty: bool,
        /// Print pipeline statistics to stderr
        #[arg(long)]
        stats: bool,
        /// Text of the placeholder entry for empty lists
        #[arg(long)]
        placeholder: Option<String>,
        /// Disable ingredient-class unit rules
        #[arg(long)]
        no_heuristics: bool,
        /// Maximum decimal places in quantities
        #[arg(long)]
        precision: Option<u32>,
    },
    /// Print the shopping department of each ingredient name as CSV
    Categorize {
        /// Ingredient names
        #[arg(required = true)]
        names: Vec<String>,
        /// Also print a count per department
        #[arg(long)]
        summary: bool,
    },
    /// Show how quantity strings are parsed
    Parse {
        /// Quantity strings, e.g. "1 1/2 cups"
        #[arg(required = true)]
        quantities: Vec<String>,
    },
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "grocery_core=debug"
    } else {
        "grocery_core=warn"
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));
    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Normalize {
            file,
            pretty,
            stats,
            placeholder,
            no_heuristics,
            precision,
        } => {
            let mut config = EngineConfig::from_env();
            if let Some(placeholder) = placeholder {
                config.placeholder_item = placeholder;
            }
            if no_heuristics {
                config.unit_heuristics = false;
            }
            if let Some(precision) = precision {
                config.display_precision = precision.min(6);
            }
            normalize(file, &config, pretty, stats)?;
        }
        Commands::Categorize { names, summary } => {
            ingredient_categories::print_csv(&names, summary);
        }
        Commands::Parse { quantities } => {
            for raw in quantities {
                let parsed = parse_quantity(Some(&raw));
                match parsed.magnitude {
                    Some(magnitude) => {
                        println!("{:?}: magnitude={} unit={:?}", raw, magnitude, parsed.unit)
                    }
                    None => println!("{:?}: unparseable", raw),
                }
            }
        }
    }

    Ok(())
}

fn normalize(
    file: Option<PathBuf>,
    config: &EngineConfig,
    pretty: bool,
    show_stats: bool,
) -> Result<()> {
    let content = match &file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
    };

    // Non-JSON input is handed over as text and read one item per line.
    let input: serde_json::Value = serde_json::from_str(&content)
        .unwrap_or_else(|_| serde_json::Value::String(content.clone()));

    let output = run_pipeline_with_stats(&input, config).context("Failed to normalize input")?;

    let json = if pretty {
        serde_json::to_string_pretty(&output.list)?
    } else {
        serde_json::to_string(&output.list)?
    };
    println!("{}", json);

    if show_stats {
        eprintln!("{}", serde_json::to_string_pretty(&output.stats)?);
    }

    Ok(())
}
