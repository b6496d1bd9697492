use std::net::IpAddr;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(name = "portal", about = "Serve practice questions over HTTP")]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Commands {
    Serve(Serve),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub(crate) enum StoreKind {
    #[default]
    Sqlite,
    Hosted,
}

impl StoreKind {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::Hosted => "hosted",
        }
    }
}

#[derive(Debug, Clone, Args)]
pub(crate) struct Serve {
    #[arg(long, help = "Listen address (default: from $PORTAL_BIND_ADDR or 127.0.0.1)")]
    pub(crate) host: Option<IpAddr>,

    #[arg(short, long, help = "Listen port (default: from $PORTAL_BIND_ADDR or 8080)")]
    pub(crate) port: Option<u16>,

    #[arg(long, help = "SQLite URL or path (default: $PORTAL_DB_URL or sqlite:dev.sqlite3)")]
    pub(crate) db: Option<String>,

    #[arg(long, value_enum, default_value_t = StoreKind::Sqlite)]
    pub(crate) store: StoreKind,
}
