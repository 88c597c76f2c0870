use clap::{Parser, Subcommand};
use curation_letter::render::{self, Edition, Renderer};
use curation_letter::{artifacts, config, naming, output, parse, sample, server};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "curation-letter")]
#[command(about = "Turn a curation spreadsheet into an email-ready HTML newsletter")]
#[command(long_about = "\
Turn a curation spreadsheet into an email-ready HTML newsletter

Each spreadsheet row is one item. The first row holds the headers:

  Type de ressource | Image | Titre de la ressource | Description de la ressource
  Lien | Date | Horaire | Localité | Prix | Langue

English headers (type, image, title, description, link, date, time,
location, price, language) work too. Recognized types:

  introduction                      Opening paragraphs, no heading
  ressource en vedette / featured   Large card
  ressources / resource             Cards
  vidéothèque / video               Cards
  événements / event                Date, time, location, price, language

Sections always appear in that order; row order only matters within a
section. Rows without a type are skipped.

Run 'curation-letter sample exemple.xlsx' for a ready-made spreadsheet and
'curation-letter gen-config' for a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Directory holding config.toml
    #[arg(long, default_value = ".", global = true)]
    config_dir: PathBuf,

    /// Debug logging (RUST_LOG wins when set)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the web front end
    Serve,
    /// Parse a spreadsheet and write the newsletter
    Generate {
        /// Spreadsheet (.xls or .xlsx)
        file: PathBuf,
        /// Date shown in the header, e.g. "Janvier 2025" (default: current month)
        #[arg(long)]
        date: Option<String>,
        /// Where to write the newsletter (default: server.output_dir)
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Print the records parsed from a spreadsheet
    Parse {
        /// Spreadsheet (.xls or .xlsx)
        file: PathBuf,
        /// Print JSON instead of the inventory
        #[arg(long)]
        json: bool,
    },
    /// List generated newsletters, newest first
    History,
    /// Write an example spreadsheet covering every resource type
    Sample {
        /// Destination .xlsx file
        path: PathBuf,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Serve => {
            let config = config::load_config(&cli.config_dir, config::process_env)?;
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(server::serve(config))?;
        }
        Command::Generate {
            file,
            date,
            output_dir,
        } => {
            let config = config::load_config(&cli.config_dir, config::process_env)?;
            let resources = parse::parse_file(&file, &config.defaults)?;
            if resources.is_empty() {
                return Err(format!("no resources found in {}", file.display()).into());
            }
            let output_dir = output_dir.unwrap_or_else(|| config.server.output_dir.clone());
            let now = chrono::Local::now().naive_local();

            let renderer = Renderer::from_config(&config);
            let edition = Edition::new(date.as_deref(), now, renderer.locale());
            let html = renderer.render(&resources, &edition);
            let output_file = artifacts::write_new(
                &output_dir,
                &naming::newsletter_filename(&naming::stamp(now)),
                html.as_bytes(),
            )?;
            let output_path = output_dir.join(output_file);
            output::print_generate_output(&resources, &render::stats(&resources), &output_path);
        }
        Command::Parse { file, json } => {
            let config = config::load_config(&cli.config_dir, config::process_env)?;
            let resources = parse::parse_file(&file, &config.defaults)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&resources)?);
            } else {
                output::print_resources(&resources);
                println!();
                println!("{}", output::format_stats(&render::stats(&resources)));
            }
        }
        Command::History => {
            let config = config::load_config(&cli.config_dir, config::process_env)?;
            let listed = artifacts::list(&config.server.output_dir)?;
            output::print_history(&listed);
        }
        Command::Sample { path } => {
            sample::write(&path)?;
            println!("Wrote {} ({} rows)", path.display(), sample::ROWS.len());
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Log to stderr so command output on stdout stays clean.
fn init_tracing(verbose: bool) {
    let fallback = if verbose {
        "info,curation_letter=debug,tower_http=debug"
    } else {
        "warn,curation_letter=info"
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
