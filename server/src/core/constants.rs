// =============================================================================
// Application Identity
// =============================================================================

/// Application name in lowercase (for paths, identifiers and log targets)
pub const APP_NAME_LOWER: &str = "bookshelf";

/// Unix-style dotfile folder name
pub const APP_DOT_FOLDER: &str = ".bookshelf";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "bookshelf.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "BOOKSHELF_CONFIG";

// =============================================================================
// Environment Variables - Server
// =============================================================================

/// Environment variable for server host
pub const ENV_HOST: &str = "BOOKSHELF_HOST";

/// Environment variable for server port
pub const ENV_PORT: &str = "BOOKSHELF_PORT";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "BOOKSHELF_LOG";

// =============================================================================
// Server Defaults
// =============================================================================

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 8083;

/// Default log filter when neither BOOKSHELF_LOG nor RUST_LOG is set
pub const DEFAULT_LOG_FILTER: &str = "info,bookshelf=info";

/// API route prefix
pub const API_PREFIX: &str = "/api/v1";

// =============================================================================
// Environment Variables - Database
// =============================================================================

/// Environment variable for database backend (sqlite or postgres)
pub const ENV_DATABASE_BACKEND: &str = "BOOKSHELF_DATABASE_BACKEND";

/// Environment variable for the SQLite library file
pub const ENV_SQLITE_PATH: &str = "BOOKSHELF_SQLITE_PATH";

/// Environment variable for PostgreSQL connection URL
pub const ENV_POSTGRES_URL: &str = "BOOKSHELF_POSTGRES_URL";

// =============================================================================
// SQLite Database
// =============================================================================

/// Default SQLite library file (calibre's file name)
pub const DEFAULT_SQLITE_PATH: &str = "metadata.db";

/// SQLite connection pool max connections
pub const SQLITE_MAX_CONNECTIONS: u32 = 5;

/// SQLite busy timeout in seconds
pub const SQLITE_BUSY_TIMEOUT_SECS: u64 = 30;

/// SQLite cache size (negative = KB, so -64000 = 64MB)
pub const SQLITE_CACHE_SIZE: &str = "-64000";

// =============================================================================
// PostgreSQL Database
// =============================================================================

pub const POSTGRES_DEFAULT_MAX_CONNECTIONS: u32 = 20;

pub const POSTGRES_DEFAULT_MIN_CONNECTIONS: u32 = 2;

pub const POSTGRES_DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 30;

pub const POSTGRES_DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600;

pub const POSTGRES_DEFAULT_MAX_LIFETIME_SECS: u64 = 1800;

/// Statement timeout in seconds (0 disables)
pub const POSTGRES_DEFAULT_STATEMENT_TIMEOUT_SECS: u64 = 60;

// =============================================================================
// Request Handling
// =============================================================================

/// Body limit for search requests (64 KB)
pub const DEFAULT_BODY_LIMIT: usize = 64 * 1024;

/// Max time to wait for in-flight requests and pools on shutdown
pub const SHUTDOWN_TIMEOUT_SECS: u64 = 30;
