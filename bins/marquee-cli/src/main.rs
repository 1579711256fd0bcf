// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Marquee CLI
//!
//! Browse the TMDB catalog and keep a favorites list. Signed-in sessions
//! (`--identity`) use the Marquee service; anonymous sessions, or any session
//! whose service call fails, keep favorites in the local store.

mod render;

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use marquee_app_core::config::ConfigService;
use marquee_app_core::favorites::FavoritesStore;
use marquee_app_core::identity::IdentityStatus;
use marquee_app_core::prefs::{ClientPrefs, CLIENT_PREFS_KEY};
use marquee_client::tmdb::TmdbClient;
use marquee_client::{register, HttpFavorites};
use marquee_config_fs::FsConfigStore;
use marquee_proto::{MovieId, RegisterRequest};
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "marquee", author, version, about = "Browse movies and manage favorites")]
struct Args {
    /// Favorites service URL (overrides saved prefs)
    #[arg(long, global = true)]
    server: Option<String>,
    /// Signed-in identity (account email); omit to browse anonymously
    #[arg(long, global = true, env = "MARQUEE_IDENTITY")]
    identity: Option<String>,
    /// Directory for prefs and local favorites (defaults to the platform config dir)
    #[arg(long, global = true)]
    store_dir: Option<PathBuf>,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Browse the movie catalog
    Movies {
        #[command(subcommand)]
        cmd: MoviesCmd,
    },
    /// Manage favorites
    Favorites {
        #[command(subcommand)]
        cmd: FavoritesCmd,
    },
    /// Create an account on the favorites service
    Register {
        /// Display name
        #[arg(long)]
        name: String,
        /// Account email; use it as `--identity` afterwards
        #[arg(long)]
        email: String,
        /// Password
        #[arg(long)]
        password: String,
    },
}

#[derive(Subcommand, Debug)]
enum MoviesCmd {
    /// Popular movies
    Popular {
        /// 1-based page
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Search by title
    Search {
        /// Search text
        query: String,
        /// 1-based page
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Details, credits and reviews for one movie
    Show {
        /// TMDB movie id
        id: MovieId,
    },
}

#[derive(Subcommand, Debug)]
enum FavoritesCmd {
    /// Print favorite ids
    List,
    /// Print catalog details for every favorite
    Show,
    /// Add a movie
    Add {
        /// TMDB movie id
        id: MovieId,
    },
    /// Remove a movie
    Remove {
        /// TMDB movie id
        id: MovieId,
    },
    /// Add the movie if absent, remove it otherwise
    Toggle {
        /// TMDB movie id
        id: MovieId,
    },
}

/// Resolved settings for one invocation.
struct Session {
    store: FsConfigStore,
    prefs: ClientPrefs,
    server: String,
    identity: IdentityStatus,
}

impl Session {
    fn open(args: &Args) -> Result<Self> {
        let store = match &args.store_dir {
            Some(dir) => FsConfigStore::at(dir)
                .with_context(|| format!("open store dir {}", dir.display()))?,
            None => FsConfigStore::new().context("no platform config dir; pass --store-dir")?,
        };
        let config = ConfigService::new(store.clone());
        let prefs = match config.load::<ClientPrefs>(CLIENT_PREFS_KEY) {
            Ok(Some(prefs)) => prefs,
            Ok(None) => {
                let prefs = ClientPrefs::default();
                if let Err(err) = config.save(CLIENT_PREFS_KEY, &prefs) {
                    warn!(%err, "could not persist client prefs");
                }
                prefs
            }
            Err(err) => {
                warn!(%err, "unreadable client prefs; using defaults");
                ClientPrefs::default()
            }
        };
        let server = args
            .server
            .clone()
            .unwrap_or_else(|| prefs.server_url.clone());
        let identity =
            IdentityStatus::from_raw(args.identity.as_deref().or(prefs.identity.as_deref()));
        Ok(Self {
            store,
            prefs,
            server,
            identity,
        })
    }

    async fn favorites(&self) -> Result<FavoritesStore<HttpFavorites, FsConfigStore>> {
        let remote = HttpFavorites::new(&self.server).context("build HTTP client")?;
        let mut favs = FavoritesStore::new(remote, self.store.clone(), self.identity.clone());
        favs.load().await;
        Ok(favs)
    }

    fn catalog(&self) -> TmdbClient {
        let key = self.prefs.resolved_tmdb_api_key();
        match self.prefs.tmdb_base_url.as_deref() {
            Some(base_url) => TmdbClient::with_base_url(key, base_url),
            None => TmdbClient::new(key),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(io::stderr)
        .init();

    let session = Session::open(&args)?;
    let mut out = Vec::new();
    match args.cmd {
        Command::Movies { cmd } => movies(&session, cmd, &mut out).await?,
        Command::Favorites { cmd } => favorites(&session, cmd, &mut out).await?,
        Command::Register {
            name,
            email,
            password,
        } => {
            let req = RegisterRequest {
                name,
                email,
                password,
            };
            let created = register(&reqwest::Client::new(), &session.server, &req).await?;
            writeln!(
                out,
                "{} ({}). Pass --identity {} to use it.",
                created.message, created.user.email, created.user.email
            )?;
        }
    }
    io::stdout().lock().write_all(&out)?;
    Ok(())
}

async fn movies(session: &Session, cmd: MoviesCmd, out: &mut Vec<u8>) -> Result<()> {
    let catalog = session.catalog();
    match cmd {
        MoviesCmd::Popular { page } => {
            let listing = catalog.popular(page).await?;
            let favs = session.favorites().await?;
            render::movie_page(out, &listing, &favs)?;
        }
        MoviesCmd::Search { query, page } => {
            let listing = catalog.search(&query, page).await?;
            let favs = session.favorites().await?;
            if listing.results.is_empty() {
                writeln!(out, "No movies match \"{query}\".")?;
            } else {
                render::movie_page(out, &listing, &favs)?;
            }
        }
        MoviesCmd::Show { id } => {
            let details = catalog.details(id).await?;
            let credits = catalog.credits(id).await?;
            let reviews = catalog.reviews(id).await?;
            let favs = session.favorites().await?;
            render::movie(out, &details, &credits, &reviews, favs.is_favorite(id))?;
        }
    }
    Ok(())
}

async fn favorites(session: &Session, cmd: FavoritesCmd, out: &mut Vec<u8>) -> Result<()> {
    let mut favs = session.favorites().await?;
    match cmd {
        FavoritesCmd::List => {
            for id in favs.favorites() {
                writeln!(out, "{id}")?;
            }
        }
        FavoritesCmd::Show => {
            let ids = favs.favorites().as_slice();
            if ids.is_empty() {
                writeln!(out, "No favorite movies yet.")?;
            } else {
                let details = session.catalog().details_many(ids).await?;
                render::favorites(out, &details)?;
            }
        }
        FavoritesCmd::Add { id } => {
            favs.add(id).await;
            render::summary(out, &favs)?;
        }
        FavoritesCmd::Remove { id } => {
            favs.remove(id).await;
            render::summary(out, &favs)?;
        }
        FavoritesCmd::Toggle { id } => {
            let now = favs.toggle(id).await;
            writeln!(out, "{id} {}", if now { "added" } else { "removed" })?;
            render::summary(out, &favs)?;
        }
    }
    Ok(())
}
