//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `navio_core` linkage.
//! - Inspect and edit favorites in a store file without the app.

use clap::{Parser, Subcommand};
use navio_core::{
    FavoriteOutcome, FavoriteService, KvFavoriteRepository, KvRecentRepository, MapBoard,
    PlaceRecord, RecentService, SqliteKeyValueStore,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Navio store inspection tool.
#[derive(Parser, Debug)]
#[command(name = "navio_cli")]
#[command(about = "Inspect and edit Navio favorites in a store file")]
#[command(version)]
struct Cli {
    /// Without a subcommand, prints ping and core version.
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// List liked places, most recently liked first
    Liked {
        #[arg(value_name = "DB")]
        db: PathBuf,
    },
    /// Flip the liked state of a place
    Toggle {
        #[arg(value_name = "DB")]
        db: PathBuf,
        /// Place name as shown in the app
        name: String,
    },
    /// Fix drift between the favorites map and the order list
    Repair {
        #[arg(value_name = "DB")]
        db: PathBuf,
    },
    /// List recent searches, most recent first
    Recent {
        #[arg(value_name = "DB")]
        db: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Option<Command>) -> Result<(), String> {
    let Some(command) = command else {
        println!("navio_core ping={}", navio_core::ping());
        println!("navio_core version={}", navio_core::core_version());
        return Ok(());
    };

    match command {
        Command::Liked { db } => {
            let service = FavoriteService::new(KvFavoriteRepository::new(open_store(&db)?));
            for name in service.liked_names() {
                println!("{name}");
            }
        }
        Command::Toggle { db, name } => {
            let service = FavoriteService::new(KvFavoriteRepository::new(open_store(&db)?));
            let mut board = MapBoard::new();
            let place_id = board.add_place(PlaceRecord::new(name.as_str()));
            // Load first so the toggle starts from the stored state.
            service.load(&mut board, place_id);
            match service.toggle(&mut board, place_id) {
                FavoriteOutcome::Liked => println!("liked {name}"),
                FavoriteOutcome::Unliked => println!("unliked {name}"),
                other => return Err(format!("toggle failed: {other:?}")),
            }
        }
        Command::Repair { db } => {
            let service = FavoriteService::new(KvFavoriteRepository::new(open_store(&db)?));
            println!("repaired={}", service.repair());
        }
        Command::Recent { db } => {
            let repo = KvRecentRepository::new(open_store(&db)?);
            let service = RecentService::new(repo, usize::MAX);
            for place in service.list() {
                println!("{}\t{}", place.raw_value, place.name);
            }
        }
    }
    Ok(())
}

fn open_store(path: &Path) -> Result<SqliteKeyValueStore, String> {
    SqliteKeyValueStore::open(path).map_err(|err| format!("store open failed: {err}"))
}

#[cfg(test)]
mod tests {
    use super::{run, Cli, Command};
    use clap::error::ErrorKind;
    use clap::{CommandFactory, Parser};
    use navio_core::{FavoriteService, KvFavoriteRepository, SqliteKeyValueStore};
    use std::path::PathBuf;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_subcommands() {
        let cli = Cli::try_parse_from(["navio_cli", "toggle", "store.db", "Gamcheon"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Command::Toggle {
                db: PathBuf::from("store.db"),
                name: "Gamcheon".to_string(),
            })
        );

        let cli = Cli::try_parse_from(["navio_cli"]).unwrap();
        assert_eq!(cli.command, None);
    }

    #[test]
    fn reports_missing_arguments_and_help() {
        let err = Cli::try_parse_from(["navio_cli", "toggle", "store.db"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);

        let err = Cli::try_parse_from(["navio_cli", "--help"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
    }

    #[test]
    fn toggle_twice_round_trips_store() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("navio.sqlite3");
        let toggle = || Command::Toggle {
            db: db.clone(),
            name: "Gamcheon".to_string(),
        };

        run(Some(toggle())).unwrap();
        let liked = FavoriteService::new(KvFavoriteRepository::new(
            SqliteKeyValueStore::open(&db).unwrap(),
        ))
        .liked_names();
        assert_eq!(liked, vec!["Gamcheon"]);

        run(Some(toggle())).unwrap();
        run(Some(Command::Repair { db: db.clone() })).unwrap();
        let liked = FavoriteService::new(KvFavoriteRepository::new(
            SqliteKeyValueStore::open(&db).unwrap(),
        ))
        .liked_names();
        assert!(liked.is_empty());
    }
}
