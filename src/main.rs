mod app;
mod config;
mod data;
mod error;
mod globe;
mod help;
mod logging;
mod markers;
mod pager;
mod panels;
mod render;
mod settings;
mod species;
mod terminal;

use clap::{Parser, Subcommand};
use config::{GlobeConfig, Overrides};
use data::Dataset;
use pager::{InfoPager, Page, Panel};
use panels::DataPages;
use settings::Settings;
use species::Species;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "wildglobe")]
#[command(author = "Terminal Art Generator")]
#[command(version = "0.1.0")]
#[command(
    about = "Spinning terminal globe with endangered species markers and info panels",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive globe (default)
    Explore {
        /// Don't fetch land outlines over the network
        #[arg(short, long)]
        offline: bool,

        /// Seconds per frame
        #[arg(short = 't', long)]
        frame_time: Option<f32>,

        /// Directory holding the species data files
        #[arg(short, long)]
        data: Option<PathBuf>,
    },

    /// Print one info page for a species
    Show {
        /// Species name or number (tiger, beluga, panda, crane, fox, 1-5)
        species: String,

        /// Page: distribution, threats or trend
        #[arg(short, long, default_value = "distribution")]
        page: String,

        /// Panel width in columns
        #[arg(short = 'W', long, default_value = "60")]
        width: u16,

        /// Panel height in rows
        #[arg(short = 'H', long, default_value = "24")]
        height: u16,

        /// Directory holding the species data files
        #[arg(short, long)]
        data: Option<PathBuf>,
    },

    /// List the species and their marker tags
    List,
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load();

    let command = cli.command.unwrap_or(Commands::Explore {
        offline: false,
        frame_time: None,
        data: None,
    });
    match command {
        Commands::Explore { offline, frame_time, data } => {
            if let Err(e) = logging::init_file(&settings) {
                eprintln!("wildglobe: logging disabled ({})", e);
            }
            report_settings(&settings);
            let overrides = Overrides { offline, frame_time, data_dir: data };
            let config = GlobeConfig::resolve(&settings, overrides);
            app::run(&config)?;
        }
        Commands::Show { species, page, width, height, data } => {
            logging::init_stderr(&settings);
            report_settings(&settings);
            let species = species.parse::<Species>().map_err(invalid_input)?;
            let page = page.parse::<Page>().map_err(invalid_input)?;
            let dir = data.unwrap_or_else(|| settings.data.dir.clone());
            show(species, page, width, height, dir)?;
        }
        Commands::List => {
            let mut out = io::stdout().lock();
            for species in Species::ALL {
                writeln!(out, "{}  {}  {}", species.index() + 1, species.tag(), species.label())?;
            }
        }
    }

    Ok(())
}

fn report_settings(settings: &Settings) {
    if let Some(problem) = &settings.load_error {
        log::warn!("{}", problem);
    }
}

fn invalid_input(e: error::DataError) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, e)
}

/// Render one page the way the interactive panel would, then print it.
fn show(species: Species, page: Page, width: u16, height: u16, dir: PathBuf) -> io::Result<()> {
    let mut pages = DataPages::new(Dataset::new(dir));
    let mut panel = Panel::new(width, height);
    let mut pager = InfoPager::new();
    if !pager.open(species, &mut pages, &mut panel) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("panel must be at least {}x{}", Panel::MIN_WIDTH, Panel::MIN_HEIGHT),
        ));
    }
    for _ in 0..page.index() {
        pager.next(&mut pages, &mut panel);
    }
    terminal::write_ansi(&mut io::stdout().lock(), panel.rows())
}
