use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "scopegate")]
#[command(about = "scopegate CLI: inspect OAuth 2.0 scope storage")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Database URL (overrides config file and SCOPEGATE__DATABASE__URL)
    #[arg(short, long, global = true, env = "SCOPEGATE_DATABASE_URL")]
    pub database_url: Option<String>,

    /// Path to config file (defaults to ./scopegate.toml)
    #[arg(short, long, global = true, env = "SCOPEGATE_CONFIG")]
    pub config: Option<String>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    /// Output format
    #[arg(short, long, global = true)]
    pub format: Option<OutputFormat>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Table,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Apply embedded database migrations
    Migrate,
    /// Look up a single scope
    Get(GetArgs),
    /// Resolve a space-delimited scope parameter
    Resolve(ResolveArgs),
    /// List stored scopes
    List(ListArgs),
}

/// Grant type / client id filters and restriction overrides.
#[derive(clap::Args, Debug, Default)]
pub struct LookupArgs {
    /// Grant type used in the request (e.g. authorization_code)
    #[arg(long)]
    pub grant_type: Option<String>,
    /// Client id used in the request
    #[arg(long)]
    pub client_id: Option<String>,
    /// Only return scopes linked to the client (overrides config)
    #[arg(long)]
    pub limit_clients_to_scopes: bool,
    /// Only return scopes linked to the grant type (overrides config)
    #[arg(long)]
    pub limit_scopes_to_grants: bool,
}

#[derive(clap::Args)]
pub struct GetArgs {
    /// Scope identifier (e.g. read)
    pub scope: String,
    #[command(flatten)]
    pub lookup: LookupArgs,
}

#[derive(clap::Args)]
pub struct ResolveArgs {
    /// Scope parameter (e.g. "openid profile"); default scope applies if omitted
    pub scope: Option<String>,
    #[command(flatten)]
    pub lookup: LookupArgs,
}

#[derive(clap::Args)]
pub struct ListArgs {
    /// Maximum number of scopes to show
    #[arg(long, default_value_t = 100)]
    pub limit: i64,
    /// Number of scopes to skip
    #[arg(long, default_value_t = 0)]
    pub offset: i64,
}
