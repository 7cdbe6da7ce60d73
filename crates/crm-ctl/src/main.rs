use anyhow::Context;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;
mod jobs;

const USAGE: &str = "usage: crm-ctl \
    [run | refresh-customers | reload-reference <path> | resolve <discriminator>]";

enum Command {
    Resolve(String),
    Store(StoreCommand),
}

/// Commands that need configuration and a database connection.
enum StoreCommand {
    Run,
    RefreshCustomers,
    ReloadReference(PathBuf),
}

impl Command {
    fn parse(mut args: impl Iterator<Item = String>) -> anyhow::Result<Self> {
        let command = match args.next().as_deref() {
            None | Some("run") => Command::Store(StoreCommand::Run),
            Some("refresh-customers") => Command::Store(StoreCommand::RefreshCustomers),
            Some("reload-reference") => Command::Store(StoreCommand::ReloadReference(
                args.next().context(USAGE)?.into(),
            )),
            Some("resolve") => Command::Resolve(args.next().context(USAGE)?),
            Some(other) => anyhow::bail!("unknown command {other:?}\n{USAGE}"),
        };
        if args.next().is_some() {
            anyhow::bail!("unexpected arguments\n{USAGE}");
        }
        Ok(command)
    }
}

#[tokio::main]
pub async fn main() -> anyhow::Result<()> {
    let command = match Command::parse(std::env::args().skip(1))? {
        Command::Resolve(discriminator) => return resolve(&discriminator),
        Command::Store(command) => command,
    };
    dotenvy::dotenv().ok();
    let config = config::load().context("loading configuration")?;
    init_tracing(&config.tracing);
    let store = crm_db::create(&config.database)
        .await
        .context("creating database store")?;
    match command {
        StoreCommand::Run => {
            let cancellation_token = CancellationToken::new();
            let jobs = jobs::create(
                config.jobs,
                store,
                config.database.reference_data().cloned(),
            );
            let shutdown = cancellation_token.clone();
            tokio::spawn(async move {
                match tokio::signal::ctrl_c().await {
                    Ok(()) => tracing::info!("shutting down"),
                    Err(err) => tracing::error!("listening for ctrl-c: {err:?}"),
                }
                shutdown.cancel();
            });
            jobs.run(cancellation_token).await.context("running jobs")?;
        }
        StoreCommand::RefreshCustomers => {
            let stats = jobs::customer_view::Refresher::new(store)
                .refresh()
                .await
                .context("refreshing customer view")?;
            println!("{} customers in {:?}", stats.customers, stats.elapsed);
        }
        StoreCommand::ReloadReference(path) => {
            let stats = jobs::reference_data::Reloader::new(store, path.clone())
                .reload()
                .with_context(|| format!("reloading reference data from {}", path.display()))?;
            println!("{} countries, {} currencies", stats.countries, stats.currencies);
        }
    }
    Ok(())
}

fn init_tracing(config: &config::TracingConfig) {
    if config.console {
        console_subscriber::init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer())
            .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
            .init();
    }
}

/// Prints the canonical entity a polymorphic discriminator maps to.
fn resolve(discriminator: &str) -> anyhow::Result<()> {
    let kind = crm_db::EntityKind::from_discriminator(discriminator)
        .with_context(|| format!("resolving {discriminator:?}"))?;
    println!(
        "{} -> {} ({}, table {})",
        discriminator,
        kind.discriminator(),
        kind.class_name(),
        kind.table()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> anyhow::Result<Command> {
        Command::parse(args.iter().map(|arg| arg.to_string()))
    }

    #[test]
    fn run_is_the_default() {
        assert!(matches!(parse(&[]).expect("should parse"), Command::Store(StoreCommand::Run)));
        assert!(matches!(
            parse(&["run"]).expect("should parse"),
            Command::Store(StoreCommand::Run)
        ));
    }

    #[test]
    fn commands_take_their_argument() {
        assert!(matches!(
            parse(&["reload-reference", "data.json"]).expect("should parse"),
            Command::Store(StoreCommand::ReloadReference(path))
                if path == PathBuf::from("data.json")
        ));
        assert!(matches!(
            parse(&["resolve", "deal"]).expect("should parse"),
            Command::Resolve(name) if name == "deal"
        ));
        assert!(parse(&["resolve"]).is_err());
        assert!(parse(&["refresh-customers", "now"]).is_err());
        assert!(parse(&["vacuum"]).is_err());
    }

    #[test]
    fn resolve_accepts_aliases() {
        assert!(resolve("App\\Models\\Deal").is_ok());
        assert!(resolve("spaceship").is_err());
    }
}
