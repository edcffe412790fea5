//! profilekit - inspect and edit profile records in a `SQLite` database.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use eyre::{Context as _, Result};
use profilekit_core::events::TracingEventBus;
use profilekit_core::jobs::TracingJobScheduler;
use profilekit_core::storage::SqliteAccountStorage;
use profilekit_core::{AccountStore, ProfileConfig, User};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "profilekit")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the account database
    #[arg(long, env = "PROFILEKIT_DB", default_value = "profilekit.sqlite")]
    db: PathBuf,

    /// Path to a JSON configuration file
    #[arg(long, env = "PROFILEKIT_CONFIG")]
    config: Option<PathBuf>,

    /// Display name used when a record is created
    #[arg(long, global = true)]
    display_name: Option<String>,

    /// Primary email used when a record is created
    #[arg(long, global = true)]
    email: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print all properties of a user
    Show {
        /// User id
        user: String,
    },

    /// Set a scalar property
    Set {
        /// User id
        user: String,
        /// Attribute name, e.g. `phone`
        property: String,
        /// New value
        value: String,
        /// Scope, `v2-*` or legacy; keeps the current scope when omitted
        #[arg(long)]
        scope: Option<String>,
    },

    /// Add an additional email address
    AddMail {
        /// User id
        user: String,
        /// Address to add
        value: String,
        /// Scope of the new address
        #[arg(long, default_value = "v2-local")]
        scope: String,
    },

    /// Remove an additional email address
    RemoveMail {
        /// User id
        user: String,
        /// Address to remove
        value: String,
    },

    /// Look up owners by property value
    Search {
        /// Attribute name
        property: String,
        /// Candidate values
        #[arg(required = true)]
        values: Vec<String>,
    },

    /// Record the outcome of a verification job
    Verify {
        /// User id
        user: String,
        /// Attribute name
        property: String,
        /// Value the job attested
        value: String,
        /// Outcome reported by the lookup
        #[arg(long, value_enum)]
        result: VerifyOutcome,
    },

    /// Delete a user's record
    Delete {
        /// User id
        user: String,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum VerifyOutcome {
    Verified,
    Failed,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let config = match &cli.config {
        Some(path) => ProfileConfig::from_json_file(path)
            .wrap_err_with(|| format!("failed to load config from {}", path.display()))?,
        None => ProfileConfig::default(),
    };
    let storage = SqliteAccountStorage::open(&cli.db)
        .wrap_err_with(|| format!("failed to open database {}", cli.db.display()))?;
    tracing::debug!(db = %cli.db.display(), "database opened");
    let store = AccountStore::new(
        Arc::new(storage),
        Arc::new(TracingJobScheduler),
        Arc::new(TracingEventBus),
        config,
    );

    let user = |id: &str| {
        let mut user = User::new(id);
        if let Some(name) = &cli.display_name {
            user = user.with_display_name(name.as_str());
        }
        if let Some(email) = &cli.email {
            user = user.with_email(email.as_str());
        }
        user
    };

    match &cli.command {
        Commands::Show { user: id } => commands::show(&store, &user(id)),
        Commands::Set {
            user: id,
            property,
            value,
            scope,
        } => commands::set(&store, &user(id), property, value, scope.as_deref()),
        Commands::AddMail {
            user: id,
            value,
            scope,
        } => commands::add_mail(&store, &user(id), value, scope),
        Commands::RemoveMail { user: id, value } => {
            commands::remove_mail(&store, &user(id), value)
        }
        Commands::Search { property, values } => commands::search(&store, property, values),
        Commands::Verify {
            user: id,
            property,
            value,
            result,
        } => commands::verify(
            &store,
            &user(id),
            property,
            value,
            matches!(result, VerifyOutcome::Verified),
        ),
        Commands::Delete { user: id } => commands::delete(&store, &user(id)),
    }
}
