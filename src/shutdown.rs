//! Stop a run on Ctrl+C or SIGTERM and close the automation session.

use std::future::Future;
use tracing::{info, warn};
use wadrive_core::traits::Device;

/// How a guarded run ended.
#[derive(Debug, PartialEq, Eq)]
pub enum Finished<T> {
    Completed(T),
    Interrupted,
}

/// Resolves on Ctrl+C, or on SIGTERM on unix.
pub async fn signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = term.recv() => {}
                }
                return;
            }
            Err(e) => warn!("cannot listen for SIGTERM: {e}"),
        }
    }
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("cannot listen for Ctrl+C: {e}");
        std::future::pending::<()>().await;
    }
}

/// Drive `work` until it finishes or `stop` fires. The device session is
/// closed either way.
pub async fn run_until<T, E>(
    device: &dyn Device,
    work: impl Future<Output = Result<T, E>>,
    stop: impl Future<Output = ()>,
) -> Result<Finished<T>, E> {
    let outcome = tokio::select! {
        result = work => result.map(Finished::Completed),
        () = stop => {
            info!("Received shutdown signal, stopping the run");
            Ok(Finished::Interrupted)
        }
    };
    if let Err(e) = device.quit().await {
        warn!("closing the automation session failed: {e}");
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automation::fake::{Call, FakeDevice};
    use wadrive_core::error::WadriveError;

    #[tokio::test]
    async fn test_completed_run_quits_session() {
        let fake = FakeDevice::new();
        let out = run_until(
            &fake,
            async { Ok::<_, WadriveError>(7) },
            std::future::pending(),
        )
        .await
        .unwrap();
        assert_eq!(out, Finished::Completed(7));
        assert_eq!(fake.calls(), vec![Call::Quit]);
    }

    #[tokio::test]
    async fn test_signal_interrupts_run() {
        let fake = FakeDevice::new();
        let out = run_until(
            &fake,
            std::future::pending::<Result<u8, WadriveError>>(),
            async {},
        )
        .await
        .unwrap();
        assert_eq!(out, Finished::Interrupted);
        assert_eq!(fake.calls(), vec![Call::Quit]);
    }

    #[tokio::test]
    async fn test_failed_run_still_quits() {
        let fake = FakeDevice::new();
        fake.fail("quit", WadriveError::SessionLost("already gone".into()));
        let err = run_until(
            &fake,
            async { Err::<u8, _>(WadriveError::Ledger("no message".into())) },
            std::future::pending(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, WadriveError::Ledger(_)));
    }
}
