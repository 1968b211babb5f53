use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config;
use crate::domain::id::TrackId;
use crate::http::server::HttpServer;
use crate::storage::operations::TrackRepository;
use crate::storage::query::{SortField, SortOrder, TrackQuery};

#[derive(Parser)]
#[command(name = "trackshelf")]
#[command(version)]
#[command(about = "Music track catalog service")]
pub struct Cli {
    /// Path to the config TOML file
    #[arg(short, long, env = "TRACKSHELF_CONFIG", default_value = "trackshelf.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run http server hosting the catalog
    Serve,
    /// List tracks in the catalog
    List {
        /// Case-insensitive text to look for in title, artist and album
        #[arg(short, long)]
        search: Option<String>,
        /// Only tracks tagged with this genre
        #[arg(short, long)]
        genre: Option<String>,
        /// Case-insensitive text to look for in the artist
        #[arg(short, long)]
        artist: Option<String>,
        /// Field to sort by, e.g. title or createdAt
        #[arg(long, default_value = "createdAt")]
        sort: SortField,
        /// asc or desc
        #[arg(long, default_value = "desc")]
        order: SortOrder,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },
    /// Show a single track
    Show {
        /// Slug of the track
        slug: String,
    },
    /// Delete tracks and their uploaded audio
    Delete {
        /// Ids of the tracks to delete
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// List the genres tracks can be tagged with
    Genres,
}

fn open_repository(cfg: &config::Config) -> anyhow::Result<TrackRepository> {
    TrackRepository::new(&cfg.database, &cfg.media).with_context(|| "Failed to open track catalog")
}

/// Entrypoint for CLI
pub fn run() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // static reference data, no catalog needed
    if let Commands::Genres = cli.command {
        for genre in crate::domain::genre::genres() {
            println!("{genre}");
        }
        return Ok(());
    }

    let cfg = config::Config::load(&cli.config)?;

    match cli.command {
        Commands::Serve => {
            let repository = open_repository(&cfg)?;
            let media_root = cfg.media.backend.local_root().map(|root| root.to_path_buf());

            let http_server = HttpServer::new(repository, cfg.http, media_root);

            println!(
                "HTTP server running at http://{}:{}",
                http_server.config.bind_addr, http_server.config.port
            );
            http_server.run();
        }

        Commands::List {
            search,
            genre,
            artist,
            sort,
            order,
            page,
            limit,
        } => {
            anyhow::ensure!(page > 0 && limit > 0, "page and limit must be positive");

            let repository = open_repository(&cfg)?;
            let query = TrackQuery {
                search,
                genre,
                artist,
                sort,
                order,
                page,
                limit,
            };
            let page = repository.get_tracks(&query)?;

            println!(
                "Showing page {} of {} ({} tracks in total)",
                page.page, page.total_pages, page.total
            );
            for track in &page.items {
                println!("  {} - {} [{}]", track.artist, track.title, track.slug);
                println!("    id: {}", track.id);
                if !track.genres.is_empty() {
                    println!("    genres: {}", track.genres.join(", "));
                }
                if track.has_audio_file() {
                    println!("    audio: {}", track.audio_file);
                }
            }
        }

        Commands::Show { slug } => {
            let repository = open_repository(&cfg)?;
            match repository.get_track_by_slug(&slug)? {
                Some(track) => println!("{}", serde_json::to_string_pretty(&track)?),
                None => anyhow::bail!("track '{slug}' not found"),
            }
        }

        Commands::Delete { ids } => {
            let mut repository = open_repository(&cfg)?;
            let ids = ids.into_iter().map(TrackId::from).collect::<Vec<_>>();

            let report = repository.delete_multiple_tracks(&ids);

            println!("Deleted ({}):", report.success.len());
            for id in &report.success {
                println!("    - {id}");
            }
            if !report.failed.is_empty() {
                println!("Not deleted ({}):", report.failed.len());
                for id in &report.failed {
                    println!("    - {id}");
                }
            }
        }

        Commands::Genres => unreachable!("handled before loading the config"),
    }

    Ok(())
}
