//! SurrealDB connection setup
//!
//! Supports in-memory, URL (`ws://`, `surrealkv://`, ...) and cloud
//! (WebSocket + signin) connections. Every path selects the namespace and
//! database and runs the schema migration before handing the connection out.

use crate::error::StateError;
use crate::migrations;
use crate::Result;
use surrealdb::engine::any::Any;
use surrealdb::opt::auth::{Database, Root};
use surrealdb::Surreal;
use tracing::{info, instrument};

/// Default namespace for leaderboard data
pub const DEFAULT_NAMESPACE: &str = "leaderboard";
/// Default database name
pub const DEFAULT_DATABASE: &str = "main";

/// Configuration for SurrealDB Cloud connection
#[derive(Debug, Clone)]
pub struct CloudConfig {
    /// WebSocket endpoint URL (e.g., "wss://xxx.aws-use1.surrealdb.cloud")
    pub endpoint: String,
    /// Database username
    pub username: String,
    /// Database password
    pub password: String,
    /// Namespace (default: "leaderboard")
    pub namespace: String,
    /// Database name (default: "main")
    pub database: String,
    /// Whether this is a root user (true) or database user (false)
    pub is_root: bool,
}

impl CloudConfig {
    /// Create a new cloud configuration for a database user
    pub fn new(
        endpoint: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            username: username.into(),
            password: password.into(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            database: DEFAULT_DATABASE.to_string(),
            is_root: false,
        }
    }

    /// Set custom namespace
    pub fn with_namespace(mut self, ns: impl Into<String>) -> Self {
        self.namespace = ns.into();
        self
    }

    /// Set custom database
    pub fn with_database(mut self, db: impl Into<String>) -> Self {
        self.database = db.into();
        self
    }

    /// Set whether this is a root user
    pub fn with_root(mut self, is_root: bool) -> Self {
        self.is_root = is_root;
        self
    }

    /// Create from environment variables
    ///
    /// Reads:
    /// - SURREALDB_ENDPOINT, SURREALDB_USERNAME, SURREALDB_PASSWORD (all required)
    /// - SURREALDB_NAMESPACE (optional, default: "leaderboard")
    /// - SURREALDB_DATABASE (optional, default: "main")
    /// - SURREALDB_ROOT (optional) - "true" for root users
    ///
    /// Returns `None` unless all three required variables are set.
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let mut config = Self::new(
            get("SURREALDB_ENDPOINT")?,
            get("SURREALDB_USERNAME")?,
            get("SURREALDB_PASSWORD")?,
        );
        if let Some(ns) = get("SURREALDB_NAMESPACE") {
            config = config.with_namespace(ns);
        }
        if let Some(db) = get("SURREALDB_DATABASE") {
            config = config.with_database(db);
        }
        if let Some(root) = get("SURREALDB_ROOT") {
            config = config.with_root(root.eq_ignore_ascii_case("true"));
        }
        Some(config)
    }
}

/// Connect to an in-memory SurrealDB and set up the schema.
#[instrument]
pub async fn connect_memory() -> Result<Surreal<Any>> {
    info!("Connecting to SurrealDB (in-memory)");
    connect_url("mem://").await
}

/// Connect to a SurrealDB URL with the default namespace/database.
#[instrument]
pub async fn connect_url(url: &str) -> Result<Surreal<Any>> {
    let db = surrealdb::engine::any::connect(url)
        .await
        .map_err(|e| StateError::Connection(format!("Failed to connect to {}: {}", url, e)))?;

    db.use_ns(DEFAULT_NAMESPACE)
        .use_db(DEFAULT_DATABASE)
        .await
        .map_err(|e| StateError::Connection(e.to_string()))?;

    migrations::init_schema(&db).await?;
    Ok(db)
}

/// Connect to SurrealDB Cloud
///
/// # Example
/// ```ignore
/// let config = CloudConfig::new(
///     "wss://xxx.aws-use1.surrealdb.cloud",
///     "your_username",
///     "your_password",
/// );
/// let db = connect_cloud(config).await?;
/// ```
#[instrument(skip(config), fields(endpoint = %config.endpoint, namespace = %config.namespace, database = %config.database))]
pub async fn connect_cloud(config: CloudConfig) -> Result<Surreal<Any>> {
    info!("Connecting to SurrealDB Cloud (root={})", config.is_root);

    let db = surrealdb::engine::any::connect(&config.endpoint)
        .await
        .map_err(|e| {
            StateError::Connection(format!("Failed to connect to {}: {}", config.endpoint, e))
        })?;

    if config.is_root {
        db.signin(Root {
            username: &config.username,
            password: &config.password,
        })
        .await
        .map_err(|e| StateError::Connection(format!("Root authentication failed: {}", e)))?;
    } else {
        db.signin(Database {
            namespace: &config.namespace,
            database: &config.database,
            username: &config.username,
            password: &config.password,
        })
        .await
        .map_err(|e| StateError::Connection(format!("Database authentication failed: {}", e)))?;
    }

    db.use_ns(&config.namespace)
        .use_db(&config.database)
        .await
        .map_err(|e| {
            StateError::Connection(format!("Failed to select namespace/database: {}", e))
        })?;

    migrations::init_schema(&db).await?;

    info!("SurrealDB Cloud connected and schema initialized");
    Ok(db)
}

/// Connect using environment variables
///
/// If SURREALDB_ENDPOINT is set, connects to cloud.
/// If SURREALDB_URL is set, connects to that URL.
/// Otherwise, falls back to in-memory.
#[instrument]
pub async fn connect_from_env() -> Result<Surreal<Any>> {
    if let Some(config) = CloudConfig::from_env() {
        info!("Cloud config found, connecting to SurrealDB Cloud");
        return connect_cloud(config).await;
    }

    if let Ok(url) = std::env::var("SURREALDB_URL") {
        info!("SURREALDB_URL found, connecting to {}", url);
        return connect_url(&url).await;
    }

    info!("No database config found, using in-memory database");
    connect_memory().await
}
