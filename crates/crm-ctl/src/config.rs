use crate::jobs;
use anyhow::Context;
use std::io::Read;

const CONFIG_PATH: &str = "./crm-config.toml";

#[derive(serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub database: crm_db::Config,
    pub jobs: jobs::Config,
    #[serde(default)]
    pub tracing: TracingConfig,
}

#[derive(serde::Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct TracingConfig {
    pub console: bool,
}

pub fn load() -> anyhow::Result<Config> {
    let mut configuration = String::with_capacity(4096);
    std::fs::File::open(CONFIG_PATH)
        .with_context(|| format!("unable to open configuration file {CONFIG_PATH}"))?
        .read_to_string(&mut configuration)
        .with_context(|| format!("unable to read configuration file {CONFIG_PATH}"))?;
    let mut config = parse(&configuration)?;
    if let Ok(db_url) = std::env::var("CRM_DATABASE_URL") {
        config.database.set_db_url(db_url);
    }
    Ok(config)
}

fn parse(configuration: &str) -> anyhow::Result<Config> {
    toml::from_str::<Config>(configuration)
        .with_context(|| format!("unable to parse configuration file {CONFIG_PATH}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn parses_the_sample_configuration() {
        let config = parse(include_str!("../../../crm-config.toml")).expect("should parse sample");
        assert!(config.jobs.customer_view.run);
        assert_eq!(config.jobs.customer_view.interval, Duration::from_secs(300));
        assert_eq!(config.jobs.reference_data.error_sleep, Duration::from_secs(60));
        assert!(!config.tracing.console);
    }

    #[test]
    fn tracing_section_is_optional() {
        let config = parse(
            r#"
            [database]
            db-url = "postgres://localhost/crm"
            max-open = 4
            max-idle = 2
            timeout-for-get = "5s"

            [jobs.customer-view]
            run = false
            interval = "1m"
            error-sleep = "10s"

            [jobs.reference-data]
            run = false
            interval = "1h"
            error-sleep = "1m"
            "#,
        )
        .expect("should parse without tracing");
        assert!(!config.tracing.console);
        assert_eq!(config.database.reference_data(), None);
    }
}
