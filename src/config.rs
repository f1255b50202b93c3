//! CLI arguments and server configuration defaults.

use clap::Parser;

pub const READ_CHUNK_SIZE: usize = 1024 * 1024;
pub const DEFAULT_MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;
pub const DEFAULT_MAX_FILE_AGE_SECS: u64 = 3 * 24 * 60 * 60;
pub const DEFAULT_PAGE_LIMIT: usize = 10;
pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_STORAGE_DIR: &str = ".updrop/uploads";
pub const DEFAULT_COUNTER_FILE: &str = ".updrop/upload_count";
pub const DEFAULT_BASE_URL: &str = "http://localhost:5010";

/// CLI arguments and environment configuration for the server.
#[derive(Parser, Debug)]
#[command(name = "updrop", version, about = "Updrop upload server")]
pub struct Args {
    #[arg(
        short = 's',
        long,
        env = "UPDROP_STORAGE_DIR",
        default_value = DEFAULT_STORAGE_DIR,
        help = "Storage directory for uploaded files"
    )]
    pub storage_dir: String,
    #[arg(
        long,
        env = "UPDROP_COUNTER_FILE",
        default_value = DEFAULT_COUNTER_FILE,
        help = "Plain text file holding the lifetime upload count"
    )]
    pub counter_file: String,
    #[arg(
        short = 'u',
        long,
        env = "UPDROP_BASE_URL",
        default_value = DEFAULT_BASE_URL,
        help = "Public base URL used to build file links"
    )]
    pub base_url: String,
    #[arg(
        short = 'b',
        long,
        env = "UPDROP_BIND",
        default_value = "0.0.0.0",
        help = "Bind address for HTTP"
    )]
    pub host: String,
    #[arg(
        short = 'p',
        long,
        env = "UPDROP_HTTP_PORT",
        default_value_t = 5010,
        help = "HTTP port"
    )]
    pub http_port: u16,
    #[arg(
        long,
        env = "UPDROP_MAX_FILE_SIZE",
        default_value_t = DEFAULT_MAX_FILE_SIZE,
        help = "Max upload size in bytes"
    )]
    pub max_file_size: u64,
    #[arg(
        long,
        env = "UPDROP_MAX_FILE_AGE_SECS",
        default_value_t = DEFAULT_MAX_FILE_AGE_SECS,
        help = "File age in seconds before the retention sweep removes it"
    )]
    pub max_file_age_secs: u64,
    #[arg(long, env = "UPDROP_CORS_ORIGINS", help = "Comma separated CORS origins")]
    pub cors_origins: Option<String>,
}
