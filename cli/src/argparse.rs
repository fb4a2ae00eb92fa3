use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "photo-search",
    about = "Search a photo collection with filter queries",
    version = "0.1.0",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Database URL, overrides DATABASE_URL
    #[arg(long, global = true)]
    pub database_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a filter query and print the results as JSON
    Search(SearchArgs),
    /// Print the SQL a filter compiles to, without touching a database
    Explain(ExplainArgs),
    /// Load the demo photos and albums
    SeedDemo,
    /// Print the photos of one album as JSON
    Album(AlbumArgs),
}

#[derive(Args)]
pub struct SearchArgs {
    /// Filter, e.g. 'country:at year:2016 "Golden Hour"'
    pub filter: String,

    /// Combine direct and album matches into one list
    #[arg(long)]
    pub merged: bool,

    #[arg(long, default_value_t = 0)]
    pub offset: i64,

    #[arg(long, default_value_t = 100)]
    pub limit: i64,

    /// Include private and archived photos
    #[arg(long)]
    pub all: bool,
}

#[derive(Args)]
pub struct ExplainArgs {
    pub filter: String,

    /// sqlite, mysql or postgres
    #[arg(long, default_value = "sqlite")]
    pub dialect: String,
}

#[derive(Args)]
pub struct AlbumArgs {
    pub uid: String,

    #[arg(long, default_value_t = 0)]
    pub offset: i64,

    #[arg(long, default_value_t = 100)]
    pub limit: i64,
}
