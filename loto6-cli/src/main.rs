mod display;
mod export;
mod import;

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;

use loto6_db::db::{
    count_draws, db_path, fetch_all_draws, fetch_last_draws, insert_draw, latest_draw, migrate,
    open_db,
};
use loto6_db::models::{validate_draw, validate_numbers, Draw, PICK_COUNT, PRIZE_TIERS};
use loto6_db::rusqlite::Connection;
use loto6_scoring::{analyze, load_config, save_config, Predictor, ScoringConfig};

use crate::display::{display_draws, display_import_summary, display_prediction, display_statistics};

#[derive(Parser)]
#[command(name = "loto6", about = "Analyse des tirages Loto 6 et sélection équilibrée")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Importer les tirages depuis un fichier CSV
    Import {
        /// Chemin vers le fichier CSV
        #[arg(short, long, default_value = "data/LOTO6_ALL.csv")]
        file: PathBuf,
    },

    /// Afficher le chemin de la base de données
    DbPath,

    /// Lister les derniers tirages
    List {
        /// Nombre de tirages à afficher
        #[arg(short, long, default_value = "10")]
        last: u32,
    },

    /// Ajouter un tirage manuellement
    Add,

    /// Calculer les scores et proposer six numéros
    Predict {
        /// Fichier de configuration JSON (poids, fenêtre récente, plafonds)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Exporter le résultat en JSON
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Afficher les répartitions pair/impair, bas/haut, sommes et consécutifs
    Stats,

    /// Écrire la configuration par défaut dans un fichier
    InitConfig {
        #[arg(short, long, default_value = "loto6-config.json")]
        output: PathBuf,
    },
}

fn init_tracing() -> Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Impossible d'installer le subscriber tracing")?;
    Ok(())
}

fn main() -> Result<()> {
    init_tracing()?;
    let cli = Cli::parse();

    if let Command::InitConfig { output } = &cli.command {
        return cmd_init_config(output);
    }

    let path = db_path();
    let conn = open_db(&path)?;
    migrate(&conn)?;
    debug!(path = %path.display(), "base ouverte");

    match cli.command {
        Command::Import { file } => cmd_import(&conn, &file),
        Command::DbPath => {
            println!("{}", path.display());
            Ok(())
        }
        Command::List { last } => cmd_list(&conn, last),
        Command::Add => cmd_add(&conn),
        Command::Predict { config, json } => cmd_predict(&conn, config.as_deref(), json.as_deref()),
        Command::Stats => cmd_stats(&conn),
        Command::InitConfig { output } => cmd_init_config(&output),
    }
}

/// Vrai si la base contient au moins un tirage ; sinon affiche l'invite d'import.
fn ensure_history(conn: &Connection) -> Result<bool> {
    if count_draws(conn)? == 0 {
        println!("Base vide. Lancez d'abord : loto6 import");
        return Ok(false);
    }
    Ok(true)
}

fn cmd_import(conn: &Connection, file: &Path) -> Result<()> {
    let result = import::import_csv(conn, file)?;
    display_import_summary(&result);
    Ok(())
}

fn cmd_list(conn: &Connection, last: u32) -> Result<()> {
    if !ensure_history(conn)? {
        return Ok(());
    }
    let draws = fetch_last_draws(conn, last)?;
    display_draws(&draws);
    Ok(())
}

fn cmd_predict(conn: &Connection, config: Option<&Path>, json: Option<&Path>) -> Result<()> {
    if !ensure_history(conn)? {
        return Ok(());
    }

    let config = match config {
        Some(path) => load_config(path)?,
        None => ScoringConfig::default(),
    };

    let draws = fetch_all_draws(conn)?;
    let predictor = Predictor::new(config)?;
    let result = predictor.predict(&draws)?;

    display_prediction(&result);

    if let Some(out) = json {
        export::export_prediction(&result, out)?;
        println!("\nRésultat exporté dans {}", out.display());
    }
    Ok(())
}

fn cmd_stats(conn: &Connection) -> Result<()> {
    if !ensure_history(conn)? {
        return Ok(());
    }
    let draws = fetch_all_draws(conn)?;
    let report = analyze(&draws)?;
    display_statistics(&report, draws.len());
    Ok(())
}

fn cmd_init_config(output: &Path) -> Result<()> {
    save_config(&ScoringConfig::default(), output)?;
    println!("Configuration par défaut écrite dans {}", output.display());
    Ok(())
}

fn cmd_add(conn: &Connection) -> Result<()> {
    println!("Ajout d'un tirage manuellement\n");

    let next = latest_draw(conn)?.map(|d| d.draw_number + 1).unwrap_or(1);
    let raw_number = prompt(&format!("Numéro du tirage [{}] : ", next))?;
    let draw_number = if raw_number.is_empty() {
        next
    } else {
        raw_number
            .parse::<u32>()
            .with_context(|| format!("Numéro de tirage invalide: '{}'", raw_number))?
    };

    let raw_date = prompt("Date (AAAA/MM/JJ) : ")?;
    let date = import::parse_date(&raw_date)?;

    let numbers = prompt_numbers()?;
    let bonus = prompt_bonus()?;

    validate_draw(&numbers, bonus)?;

    let draw = Draw {
        draw_number,
        date,
        numbers,
        bonus,
        prize_counts: [0; PRIZE_TIERS],
        prize_amounts: [0; PRIZE_TIERS],
        carryover: 0,
        sales: 0,
    };

    println!("\nTirage à insérer :");
    display_draws(std::slice::from_ref(&draw));

    let confirm = prompt("\nConfirmer l'insertion ? (o/n) : ")?;
    if confirm.trim().to_lowercase() == "o" {
        if insert_draw(conn, &draw)? {
            println!("Tirage inséré avec succès.");
        } else {
            println!("Ce tirage existe déjà (doublon ignoré).");
        }
    } else {
        println!("Insertion annulée.");
    }

    Ok(())
}

fn prompt(msg: &str) -> Result<String> {
    print!("{}", msg);
    io::stdout().flush()?;
    let mut input = String::new();
    let read = io::stdin()
        .read_line(&mut input)
        .context("Erreur de lecture")?;
    if read == 0 {
        bail!("Entrée standard fermée");
    }
    Ok(input.trim().to_string())
}

fn prompt_numbers() -> Result<[u8; PICK_COUNT]> {
    loop {
        let input = prompt("6 numéros (séparés par des espaces, 1-43) : ")?;
        let nums: Result<Vec<u8>, _> = input.split_whitespace().map(|s| s.parse::<u8>()).collect();
        match nums {
            Ok(v) => match validate_numbers(&v) {
                Ok(()) => {
                    let mut arr = [0u8; PICK_COUNT];
                    arr.copy_from_slice(&v);
                    return Ok(arr);
                }
                Err(e) => println!("{}. Réessayez.", e),
            },
            Err(_) => println!("Entrez exactement 6 nombres. Réessayez."),
        }
    }
}

fn prompt_bonus() -> Result<u8> {
    loop {
        let input = prompt("Numéro bonus (1-43) : ")?;
        match input.parse::<u8>() {
            Ok(b) if (1..=43).contains(&b) => return Ok(b),
            _ => println!("Bonus invalide (1-43). Réessayez."),
        }
    }
}
