use std::{future::Future, path::PathBuf, sync::Arc, time::Duration};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

pub mod customer_view;
pub mod reference_data;

pub fn create(config: Config, store: crm_db::Store, reference_path: Option<PathBuf>) -> Jobs {
    Jobs {
        config: Arc::new(config),
        store,
        reference_path,
    }
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("customer view refresh: {0}")]
    CustomerView(#[from] customer_view::Error),
    #[error("reference data reload: {0}")]
    ReferenceData(#[from] reference_data::Error),
    #[error("job task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

#[derive(Clone, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub customer_view: customer_view::Config,
    pub reference_data: reference_data::Config,
}

pub struct Jobs {
    config: Arc<Config>,
    store: crm_db::Store,
    reference_path: Option<PathBuf>,
}

impl Jobs {
    /// Runs every job until the token is cancelled.
    pub async fn run(&self, cancellation_token: CancellationToken) -> Result<(), Error> {
        let customer_view = tokio::spawn(run_customer_view(
            customer_view::Refresher::new(self.store.clone()),
            self.config.customer_view.clone(),
            cancellation_token.clone(),
        ));
        let reference_data = match &self.reference_path {
            Some(path) => Some(tokio::spawn(run_reference_data(
                reference_data::Reloader::new(self.store.clone(), path.clone()),
                self.config.reference_data.clone(),
                cancellation_token.clone(),
            ))),
            None => {
                tracing::warn!("no reference-data path configured, reload job disabled");
                None
            }
        };
        customer_view.await?;
        if let Some(reference_data) = reference_data {
            reference_data.await?;
        }
        Ok(())
    }
}

#[tracing::instrument(skip_all)]
async fn run_customer_view(
    refresher: customer_view::Refresher,
    config: customer_view::Config,
    cancellation_token: CancellationToken,
) {
    let refresher = &refresher;
    run_periodically(
        config.run,
        config.interval,
        config.error_sleep,
        cancellation_token,
        move || async move {
            let stats = refresher.refresh().await?;
            tracing::info!("Customer View Statistics: {stats:?}");
            Ok::<_, Error>(())
        },
    )
    .await
}

#[tracing::instrument(skip_all)]
async fn run_reference_data(
    reloader: reference_data::Reloader,
    config: reference_data::Config,
    cancellation_token: CancellationToken,
) {
    let reloader = &reloader;
    run_periodically(
        config.run,
        config.interval,
        config.error_sleep,
        cancellation_token,
        move || async move {
            let stats = reloader.reload()?;
            tracing::info!("Reference Data Statistics: {stats:?}");
            Ok::<_, Error>(())
        },
    )
    .await
}

/// Calls `step` every `interval` while `run` is set, backing off for
/// `error_sleep` after a failure. Returns once the token is cancelled.
async fn run_periodically<F, Fut>(
    run: bool,
    interval: Duration,
    error_sleep: Duration,
    cancellation_token: CancellationToken,
    step: F,
) where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<(), Error>>,
{
    loop {
        let pause = if run {
            match step().await {
                Ok(()) => interval,
                Err(err) => {
                    tracing::error!("Job Error: {err:?}");
                    error_sleep
                }
            }
        } else {
            error_sleep
        };
        tokio::select! {
            _ = cancellation_token.cancelled() => (),
            _ = sleep(pause) => ()
        }
        if cancellation_token.is_cancelled() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn stops_when_cancelled() {
        let calls = AtomicUsize::new(0);
        let token = CancellationToken::new();
        let stopper = token.clone();
        run_periodically(true, Duration::from_millis(1), Duration::from_millis(1), token, || {
            if calls.fetch_add(1, Ordering::SeqCst) == 2 {
                stopper.cancel();
            }
            async { Ok(()) }
        })
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn disabled_jobs_never_step() {
        let calls = AtomicUsize::new(0);
        let token = CancellationToken::new();
        token.cancel();
        run_periodically(false, Duration::from_secs(60), Duration::from_secs(60), token, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok(()) }
        })
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failures_keep_the_loop_alive() {
        let calls = AtomicUsize::new(0);
        let token = CancellationToken::new();
        let stopper = token.clone();
        run_periodically(true, Duration::from_secs(60), Duration::from_millis(1), token, || {
            let call = calls.fetch_add(1, Ordering::SeqCst);
            if call == 1 {
                stopper.cancel();
            }
            async move {
                if call == 0 {
                    Err(Error::from(customer_view::Error::Store(crm_db::Error::Poisoned)))
                } else {
                    Ok(())
                }
            }
        })
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
