//! core command line arguments
use clap::Parser;

/// One year, in minutes
pub const MAX_TOKEN_TIMEOUT: i64 = 60 * 24 * 365;

/// cmd line args
#[derive(Parser, Clone, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// set release environment
    #[arg(
        short,
        long,
        help = "Set release environment (dev, prod)",
        default_value = "dev"
    )]
    pub release_env: String,
    /// Application address
    #[arg(long, help = "Set app bind address", default_value = "127.0.0.1")]
    pub address: String,
    /// Application port
    #[arg(long, help = "Set app port", default_value = "9000")]
    pub port: u16,
    /// Token expiration in minutes
    #[arg(
        short,
        long,
        help = "Set the token expiration limit in minutes.",
        default_value = "60",
        value_parser = clap::value_parser!(i64).range(1..=MAX_TOKEN_TIMEOUT)
    )]
    pub token_timeout: i64,
    /// Number of carriers returned by smart selection
    #[arg(
        long,
        help = "Default number of carriers returned by smart selection",
        default_value = "3"
    )]
    pub selection_limit: usize,
    /// Start with empty carrier listings
    #[arg(
        long,
        help = "Don't seed the mock carrier listings on startup",
        default_value = "false"
    )]
    pub skip_seed: bool,
    /// Admin bootstrap
    #[arg(
        long,
        help = "Seed an admin with this email. Password is read from CARGOLINK_ADMIN_PASSWORD"
    )]
    pub admin_email: Option<String>,
}

impl Default for Args {
    /// Same values clap produces when no flags are passed
    fn default() -> Self {
        Args::parse_from([crate::APP_NAME])
    }
}

// Tests
//-------------------------------------------------------------------------------
