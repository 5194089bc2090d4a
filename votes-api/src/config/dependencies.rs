//! Dependency initialization and wiring for the votes API.

use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderValue;
use tracing::{info, warn};
use votes_pipeline::{VoteService, VoteServiceConfig};
use votes_repository::{
    MemoryVotableItemRepository, PostgresVotableItemRepository, VotableItemRepository,
};

use crate::errors::StartupError;

/// Default HTTP listen address.
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

/// Default PostgreSQL pool size.
const DEFAULT_MAX_CONNECTIONS: u32 = 20;

/// Web clients allowed to call the API from a browser.
const DEFAULT_CORS_ORIGINS: &[&str] = &[
    "http://localhost:5173",
    "http://127.0.0.1:5173",
    "https://stdybdyv1.netlify.app",
    "https://altcampv1.netlify.app",
];

/// Where votable items are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    /// In-process store; contents are lost on restart.
    Memory,
}

impl StoreBackend {
    /// Parse the backend from `VOTES_STORE`.
    ///
    /// Valid values: "postgres" or "memory" (case-insensitive).
    /// Defaults to "postgres" if not set or invalid.
    fn from_env() -> Self {
        match env::var("VOTES_STORE")
            .unwrap_or_else(|_| "postgres".to_string())
            .to_lowercase()
            .as_str()
        {
            "postgres" | "postgresql" => Self::Postgres,
            "memory" | "in-memory" => Self::Memory,
            _ => {
                warn!("Invalid VOTES_STORE, defaulting to 'postgres'");
                Self::Postgres
            }
        }
    }
}

/// Settings read from the environment.
#[derive(Debug, Clone)]
pub struct Settings {
    pub store: StoreBackend,
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub run_migrations: bool,
    pub bind_addr: SocketAddr,
    pub cors_origins: Vec<HeaderValue>,
    pub service: VoteServiceConfig,
}

impl Settings {
    /// Read settings from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `VOTES_STORE`: "postgres" or "memory" (default: postgres)
    /// - `DATABASE_URL`: PostgreSQL connection string (required for postgres)
    /// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 20)
    /// - `RUN_MIGRATIONS`: Apply the embedded migrations at startup (default: false)
    /// - `BIND_ADDR`: HTTP listen address (default: 127.0.0.1:8080)
    /// - `VOTE_MAX_RETRIES`: Retries after a lost concurrent update (default: 5)
    /// - `VOTE_STORE_TIMEOUT_MS`: Timeout for each store call (default: 2000)
    /// - `ALLOW_SELF_VOTES`: Whether authors may vote on their own items (default: true)
    /// - `CORS_ALLOWED_ORIGINS`: Comma separated browser origins
    pub fn from_env() -> Result<Self, StartupError> {
        let store = StoreBackend::from_env();
        let database_url = env::var("DATABASE_URL").ok().filter(|url| !url.is_empty());
        if store == StoreBackend::Postgres && database_url.is_none() {
            return Err(StartupError::config(
                "DATABASE_URL must be set when VOTES_STORE=postgres",
            ));
        }

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_addr
            .parse::<SocketAddr>()
            .map_err(|e| StartupError::config(format!("Invalid BIND_ADDR '{}': {}", bind_addr, e)))?;

        let defaults = VoteServiceConfig::default();
        let store_timeout_ms = parse_or(
            "VOTE_STORE_TIMEOUT_MS",
            defaults.store_timeout.as_millis() as u64,
        );
        let service = defaults
            .clone()
            .with_max_retries(parse_or("VOTE_MAX_RETRIES", defaults.max_retries))
            .with_store_timeout(Duration::from_millis(store_timeout_ms))
            .with_self_votes(flag_or("ALLOW_SELF_VOTES", defaults.allow_self_votes));

        Ok(Self {
            store,
            database_url,
            max_connections: parse_or("DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS),
            run_migrations: flag_or("RUN_MIGRATIONS", false),
            bind_addr,
            cors_origins: cors_origins_from_env()?,
            service,
        })
    }
}

/// Container for all initialized dependencies.
pub struct Dependencies {
    pub service: VoteService,
    pub bind_addr: SocketAddr,
    pub cors_origins: Vec<HeaderValue>,
}

impl Dependencies {
    /// Initialize all dependencies from environment variables.
    ///
    /// See [`Settings::from_env`] for the variables read.
    pub async fn new() -> Result<Self, StartupError> {
        let settings = Settings::from_env()?;
        Self::from_settings(settings).await
    }

    /// Connect the configured store and build the vote service on top of it.
    pub async fn from_settings(settings: Settings) -> Result<Self, StartupError> {
        info!(
            store = ?settings.store,
            bind_addr = %settings.bind_addr,
            max_retries = settings.service.max_retries,
            store_timeout_ms = settings.service.store_timeout.as_millis() as u64,
            allow_self_votes = settings.service.allow_self_votes,
            "Initializing dependencies"
        );

        let repository: Arc<dyn VotableItemRepository> = match settings.store {
            StoreBackend::Memory => {
                warn!("Using the in-memory store; votes will not survive a restart");
                Arc::new(MemoryVotableItemRepository::new())
            }
            StoreBackend::Postgres => {
                let database_url = settings
                    .database_url
                    .as_deref()
                    .ok_or_else(|| StartupError::config("DATABASE_URL must be set"))?;
                Arc::new(
                    Self::connect_postgres(
                        database_url,
                        settings.max_connections,
                        settings.run_migrations,
                    )
                    .await?,
                )
            }
        };

        Ok(Self {
            service: VoteService::with_config(repository, settings.service),
            bind_addr: settings.bind_addr,
            cors_origins: settings.cors_origins,
        })
    }

    async fn connect_postgres(
        database_url: &str,
        max_connections: u32,
        run_migrations: bool,
    ) -> Result<PostgresVotableItemRepository, StartupError> {
        let repository = PostgresVotableItemRepository::connect(database_url, max_connections)
            .await
            .map_err(|e| StartupError::config(format!("Failed to connect to PostgreSQL: {}", e)))?;
        info!(max_connections, "PostgreSQL connection established");

        if run_migrations {
            repository.run_migrations().await?;
            info!("Migrations applied");
        }

        if !repository.check_tables_created().await? {
            return Err(StartupError::config(
                "Votable item tables are missing; run with RUN_MIGRATIONS=true",
            ));
        }

        Ok(repository)
    }
}

fn parse_or<T: FromStr>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => raw.trim().parse::<T>().unwrap_or_else(|_| {
            warn!(variable = name, value = %raw, "Invalid value, using default");
            default
        }),
        Err(_) => default,
    }
}

fn flag_or(name: &str, default: bool) -> bool {
    match env::var(name) {
        Ok(raw) => match raw.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" => true,
            "false" | "0" | "no" => false,
            _ => {
                warn!(variable = name, value = %raw, "Invalid flag, using default");
                default
            }
        },
        Err(_) => default,
    }
}

fn cors_origins_from_env() -> Result<Vec<HeaderValue>, StartupError> {
    let raw = env::var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| DEFAULT_CORS_ORIGINS.join(","));
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(|origin| {
            if origin == "*" {
                return Err(StartupError::config(
                    "wildcard origin not allowed with credentials",
                ));
            }
            origin
                .parse::<HeaderValue>()
                .map_err(|e| StartupError::config(format!("Invalid CORS origin '{}': {}", origin, e)))
        })
        .collect()
}
