//! Kindred Sheet - Command line front end
//!
//! The command line front end:
//! - Shows character documents with names resolved in a display language
//! - Lists the reference catalogs (clans, disciplines, natures, ...)
//! - Re-saves documents in normalized form
//! - Creates new characters from catalog defaults

use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kindred_sheet::application::dto::{CharacterSummaryDto, TraitLineDto};
use kindred_sheet::application::ports::outbound::CatalogKind;
use kindred_sheet::application::services::{storage_error, NewCharacterRequest};
use kindred_sheet::domain::value_objects::{Language, Sex};
use kindred_sheet::infrastructure::config::AppConfig;
use kindred_sheet::infrastructure::state::AppState;

#[derive(Debug, Parser)]
#[command(name = "kindred-sheet", version, about = "Vampire: The Masquerade character sheets")]
struct Cli {
    /// Display language for names (en, de)
    #[arg(long, global = true)]
    language: Option<Language>,

    /// Directory with definition files replacing the embedded catalogs
    #[arg(long, global = true)]
    catalog_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print a character document
    Show {
        file: PathBuf,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the entries of one catalog
    Catalog {
        kind: CatalogKind,
        /// Only entries of this category (e.g. talent, discipline, merit)
        #[arg(long)]
        category: Option<String>,
    },
    /// Load a document and write it back out
    Resave { input: PathBuf, output: PathBuf },
    /// Create a character from catalog defaults
    New {
        output: PathBuf,
        #[arg(long)]
        name: String,
        #[arg(long)]
        concept: String,
        /// Clan key, e.g. nosferatu
        #[arg(long)]
        clan: String,
        #[arg(long)]
        generation: i32,
        /// Nature key or free text
        #[arg(long)]
        nature: String,
        /// Demeanor key or free text
        #[arg(long)]
        demeanor: String,
        /// Road key, defaults to humanity
        #[arg(long)]
        road: Option<String>,
        #[arg(long)]
        player: Option<String>,
        #[arg(long)]
        chronicle: Option<String>,
        #[arg(long, default_value = "diverse")]
        sex: Sex,
        /// Day of birth as yyyy-mm-dd
        #[arg(long)]
        born: Option<NaiveDate>,
    },
    /// Change one rated trait and save the document in place
    Set {
        file: PathBuf,
        /// attributes, abilities, advantages or roads
        kind: CatalogKind,
        /// Trait key; ignored for roads
        key: String,
        value: i32,
    },
}

fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let mut config = AppConfig::from_env()?;
    if let Some(language) = cli.language {
        config.language = language;
    }
    if cli.catalog_dir.is_some() {
        config.catalog_dir = cli.catalog_dir.clone();
    }

    // Logs go to stderr so stdout stays clean for JSON output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!(?config, "Configuration loaded");
    let state = AppState::new(config);

    if let Err(err) = run(cli.command, &state) {
        if let Some(storage) = storage_error(&err) {
            for cause in storage.suppressed() {
                eprintln!("  suppressed: {}", cause);
            }
        }
        return Err(err);
    }
    Ok(())
}

fn run(command: Command, state: &AppState) -> Result<()> {
    let language = state.config.language;

    match command {
        Command::Show { file, json } => {
            let outcome = state.sheets.open(&file)?;
            let summary = state.sheets.summary(&outcome.character, language);
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print_summary(&summary);
            }
            for skipped in &outcome.skipped {
                eprintln!("skipped: {}", skipped);
            }
        }
        Command::Catalog { kind, category } => {
            for entry in state
                .sheets
                .catalog_listing(kind, category.as_deref(), language)?
            {
                match entry.category {
                    Some(category) => println!("{:<24} {:<32} {}", entry.key, entry.name, category),
                    None => println!("{:<24} {}", entry.key, entry.name),
                }
            }
        }
        Command::Resave { input, output } => {
            let outcome = state.sheets.open(&input)?;
            state.sheets.save(&outcome.character, &output)?;
            println!("{} -> {}", input.display(), output.display());
        }
        Command::New {
            output,
            name,
            concept,
            clan,
            generation,
            nature,
            demeanor,
            road,
            player,
            chronicle,
            sex,
            born,
        } => {
            let character = state.sheets.new_character(NewCharacterRequest {
                name,
                concept,
                clan,
                generation,
                nature,
                demeanor,
                road,
                player,
                chronicle,
                sex,
                day_of_birth: born,
            })?;
            state.sheets.save(&character, &output)?;
            println!("{} ({})", output.display(), character.id());
        }
        Command::Set {
            file,
            kind,
            key,
            value,
        } => {
            let outcome = state.sheets.open(&file)?;
            let edited = state.sheets.set_trait(&outcome.character, kind, &key, value)?;
            state.sheets.save(&edited, &file)?;
        }
    }
    Ok(())
}

fn print_summary(summary: &CharacterSummaryDto) {
    println!("{} [{}]", summary.name, summary.id);
    println!("  Concept:    {}", summary.concept);
    if !summary.player.is_empty() {
        println!("  Player:     {}", summary.player);
    }
    if !summary.chronicle.is_empty() {
        println!("  Chronicle:  {}", summary.chronicle);
    }
    println!("  Clan:       {} ({})", summary.clan, summary.clan_disciplines.join(", "));
    println!("  Generation: {}", summary.generation);
    println!("  Nature:     {} / {}", summary.nature, summary.demeanor);
    println!("  Road:       {} {}", summary.road.name, summary.road.value);

    print_traits("Attributes", &summary.attributes);
    print_traits("Abilities", &summary.abilities);
    print_traits("Advantages", &summary.advantages);
    if !summary.merits.is_empty() {
        println!("Merits: {}", summary.merits.join(", "));
    }
    if !summary.flaws.is_empty() {
        println!("Flaws: {}", summary.flaws.join(", "));
    }

    let ceiling = summary
        .maximum_blood_pool
        .map_or_else(|| "unbounded".to_string(), |max| max.to_string());
    println!(
        "Willpower {}/{}  Blood {}/{}",
        summary.willpower - summary.used_willpower,
        summary.willpower,
        summary.blood_pool,
        ceiling
    );
    if !summary.over_limit.is_empty() {
        println!("Above generation limit: {}", summary.over_limit.join(", "));
    }
}

fn print_traits(title: &str, traits: &[TraitLineDto]) {
    println!("{}:", title);
    let mut category = None;
    for line in traits {
        if line.category != category {
            category = line.category.clone();
            if let Some(category) = &category {
                println!("  [{}]", category);
            }
        }
        println!("    {:<28} {}", line.name, line.value);
    }
}
