//! Periodic trigger loops.
//!
//! Each trigger is one sequential loop in its own task: a firing runs to
//! completion before the next fire time is computed, so two firings of the
//! same trigger never overlap. A firing that runs past the next boundary
//! simply skips it.

use std::sync::Arc;

use chrono::{NaiveTime, Utc};
use chrono_tz::Tz;
use tokio::signal;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::engine::KickoffGuard;
use crate::scheduler::timing::{next_daily_fire, next_minute_fire, wait_until};
use crate::scheduler::Notifier;

/// Create a shutdown signal receiver that flips to `true` on SIGINT/SIGTERM.
pub fn shutdown_signal() -> watch::Receiver<bool> {
    let (tx, rx) = watch::channel(false);

    tokio::spawn(async move {
        let ctrl_c = async {
            if let Err(e) = signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for Ctrl+C");
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    sigterm.recv().await;
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to install SIGTERM handler");
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => info!("Received SIGINT (Ctrl+C)"),
            _ = terminate => info!("Received SIGTERM"),
        }

        let _ = tx.send(true);
    });

    rx
}

/// Resolves once shutdown has been requested or the sender is gone.
async fn shutdown_requested(shutdown: &mut watch::Receiver<bool>) {
    while !*shutdown.borrow_and_update() {
        if shutdown.changed().await.is_err() {
            return;
        }
    }
}

/// Spawn the once-a-day digest loop firing at `at` local time in `tz`.
pub fn spawn_daily_digest(
    notifier: Arc<Notifier>,
    tz: Tz,
    at: NaiveTime,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut after = Utc::now();
        loop {
            let fire_at = next_daily_fire(after, tz, at);
            info!(next = %fire_at, "Daily digest scheduled");

            tokio::select! {
                _ = tokio::time::sleep(wait_until(fire_at, Utc::now())) => {}
                _ = shutdown_requested(&mut shutdown) => break,
            }

            tokio::select! {
                _ = notifier.run_daily_digest(Utc::now()) => {}
                _ = shutdown_requested(&mut shutdown) => break,
            }

            after = Utc::now().max(fire_at);
        }
        info!("Daily digest loop stopped");
    })
}

/// Spawn the minute-aligned kickoff watch. The loop owns the kickoff guard.
pub fn spawn_kickoff_watch(
    notifier: Arc<Notifier>,
    offset_seconds: u64,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut guard = KickoffGuard::new();
        let mut after = Utc::now();
        loop {
            let fire_at = next_minute_fire(after, offset_seconds);
            debug!(next = %fire_at, "Kickoff watch scheduled");

            tokio::select! {
                _ = tokio::time::sleep(wait_until(fire_at, Utc::now())) => {}
                _ = shutdown_requested(&mut shutdown) => break,
            }

            tokio::select! {
                _ = notifier.run_kickoff_watch(&mut guard, Utc::now()) => {}
                _ = shutdown_requested(&mut shutdown) => break,
            }

            after = Utc::now().max(fire_at);
        }
        info!("Kickoff watch loop stopped");
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_shutdown_requested_resolves_on_send() {
        let (tx, mut rx) = watch::channel(false);
        let waiter = tokio::spawn(async move { shutdown_requested(&mut rx).await });
        tx.send(true).unwrap();
        tokio::time::timeout(std::time::Duration::from_secs(1), waiter)
            .await
            .expect("should resolve")
            .unwrap();
    }

    #[tokio::test]
    async fn test_shutdown_requested_resolves_when_sender_dropped() {
        let (tx, mut rx) = watch::channel(false);
        drop(tx);
        tokio::time::timeout(std::time::Duration::from_secs(1), shutdown_requested(&mut rx))
            .await
            .expect("should resolve");
    }
}
