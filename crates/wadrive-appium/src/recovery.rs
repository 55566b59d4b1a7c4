//! Session recovery: recreate a dropped automation session and retry.
//!
//! UiAutomator2 sessions die for reasons outside our control (USB hiccups,
//! the instrumentation process being killed, server restarts). Commands that
//! fail with `SessionLost` are retried on a fresh session; everything else
//! propagates unchanged.

use crate::client::AppiumSession;
use crate::types::capabilities;
use async_trait::async_trait;
use serde_json::Value;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{error, info, warn};
use wadrive_core::{
    config::AppiumConfig,
    error::WadriveError,
    geometry::{Point, Rect, WindowSize},
    locator::Locator,
    traits::{Device, ElementId, SwipeDirection},
};

/// Something that can open a new automation session.
#[async_trait]
pub trait SessionFactory: Send + Sync {
    async fn create(&self) -> Result<Box<dyn Device>, WadriveError>;
}

/// Opens Appium sessions with fixed capabilities.
pub struct AppiumConnector {
    client: reqwest::Client,
    server_url: String,
    body: Value,
}

impl AppiumConnector {
    /// Build a connector from config. `launch` is an optional `(package, activity)`.
    pub fn new(cfg: &AppiumConfig, launch: Option<(&str, &str)>) -> Result<Self, WadriveError> {
        let client = reqwest::Client::builder()
            .timeout(cfg.request_timeout())
            .build()
            .map_err(|e| WadriveError::Config(format!("failed to build http client: {e}")))?;
        Ok(Self {
            client,
            server_url: cfg.server_url.clone(),
            body: capabilities(cfg, launch),
        })
    }
}

#[async_trait]
impl SessionFactory for AppiumConnector {
    async fn create(&self) -> Result<Box<dyn Device>, WadriveError> {
        let session = AppiumSession::create(self.client.clone(), &self.server_url, &self.body).await?;
        Ok(Box::new(session))
    }
}

/// A `Device` that transparently recreates its session when it drops.
pub struct RecoveringDevice<F: SessionFactory> {
    factory: F,
    session: Mutex<Option<Arc<dyn Device>>>,
    generation: AtomicU64,
    closed: AtomicBool,
    max_retries: u32,
    retry_delay: Duration,
}

impl<F: SessionFactory> RecoveringDevice<F> {
    /// Open the first session, retrying up to `max_retries` times.
    pub async fn connect(
        factory: F,
        max_retries: u32,
        retry_delay: Duration,
    ) -> Result<Self, WadriveError> {
        let device = Self {
            factory,
            session: Mutex::new(None),
            generation: AtomicU64::new(0),
            closed: AtomicBool::new(false),
            max_retries,
            retry_delay,
        };
        let first = device.open_with_retries().await?;
        *device.session.lock().await = Some(first);
        Ok(device)
    }

    async fn open_with_retries(&self) -> Result<Arc<dyn Device>, WadriveError> {
        let attempts = self.max_retries.max(1);
        let mut last_err = None;
        for attempt in 1..=attempts {
            match self.factory.create().await {
                Ok(session) => return Ok(Arc::from(session)),
                Err(e) => {
                    warn!("session attempt {attempt}/{attempts} failed: {e}");
                    last_err = Some(e);
                    if attempt < attempts {
                        tokio::time::sleep(self.retry_delay).await;
                    }
                }
            }
        }
        let reason = last_err.map(|e| e.to_string()).unwrap_or_default();
        error!("could not open an automation session after {attempts} attempts");
        Err(WadriveError::SessionLost(format!(
            "gave up after {attempts} session attempts: {reason}"
        )))
    }

    async fn current(&self) -> Result<Arc<dyn Device>, WadriveError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(WadriveError::SessionLost("session already closed".into()));
        }
        let guard = self.session.lock().await;
        guard
            .clone()
            .ok_or_else(|| WadriveError::SessionLost("no active session".into()))
    }

    /// Replace `stale` with a fresh session. If another caller already
    /// replaced it, the newer session is returned as-is.
    async fn recreate(&self, stale: &Arc<dyn Device>) -> Result<(), WadriveError> {
        let mut guard = self.session.lock().await;
        if let Some(ref live) = *guard {
            if !Arc::ptr_eq(live, stale) {
                return Ok(());
            }
        }
        if let Err(e) = stale.quit().await {
            warn!("quitting dropped session failed (expected): {e}");
        }
        *guard = None;
        tokio::time::sleep(self.retry_delay).await;
        let fresh = self.open_with_retries().await?;
        *guard = Some(fresh);
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        info!("automation session recreated (generation {generation})");
        Ok(())
    }

    /// Run `op` against the live session, recreating it on `SessionLost`.
    async fn with_session<T, Op, Fut>(&self, op: Op) -> Result<T, WadriveError>
    where
        Op: Fn(Arc<dyn Device>) -> Fut + Send + Sync,
        Fut: Future<Output = Result<T, WadriveError>> + Send,
        T: Send,
    {
        let mut recreations = 0;
        loop {
            let session = self.current().await?;
            match op(session.clone()).await {
                Err(e) if e.is_session_lost() && recreations < self.max_retries => {
                    recreations += 1;
                    warn!(
                        "session lost ({e}); recreating ({recreations}/{})",
                        self.max_retries
                    );
                    self.recreate(&session).await?;
                }
                other => return other,
            }
        }
    }
}

#[async_trait]
impl<F: SessionFactory> Device for RecoveringDevice<F> {
    async fn find_element(&self, locator: &Locator) -> Result<ElementId, WadriveError> {
        self.with_session(|d| async move { d.find_element(locator).await })
            .await
    }

    async fn find_elements(&self, locator: &Locator) -> Result<Vec<ElementId>, WadriveError> {
        self.with_session(|d| async move { d.find_elements(locator).await })
            .await
    }

    async fn find_child(
        &self,
        parent: &ElementId,
        locator: &Locator,
    ) -> Result<ElementId, WadriveError> {
        self.with_session(|d| async move { d.find_child(parent, locator).await })
            .await
    }

    async fn find_children(
        &self,
        parent: &ElementId,
        locator: &Locator,
    ) -> Result<Vec<ElementId>, WadriveError> {
        self.with_session(|d| async move { d.find_children(parent, locator).await })
            .await
    }

    async fn click(&self, element: &ElementId) -> Result<(), WadriveError> {
        self.with_session(|d| async move { d.click(element).await })
            .await
    }

    async fn clear(&self, element: &ElementId) -> Result<(), WadriveError> {
        self.with_session(|d| async move { d.clear(element).await })
            .await
    }

    async fn send_keys(&self, element: &ElementId, text: &str) -> Result<(), WadriveError> {
        self.with_session(|d| async move { d.send_keys(element, text).await })
            .await
    }

    async fn text(&self, element: &ElementId) -> Result<String, WadriveError> {
        self.with_session(|d| async move { d.text(element).await })
            .await
    }

    async fn is_displayed(&self, element: &ElementId) -> Result<bool, WadriveError> {
        self.with_session(|d| async move { d.is_displayed(element).await })
            .await
    }

    async fn rect(&self, element: &ElementId) -> Result<Rect, WadriveError> {
        self.with_session(|d| async move { d.rect(element).await })
            .await
    }

    async fn window_size(&self) -> Result<WindowSize, WadriveError> {
        self.with_session(|d| async move { d.window_size().await })
            .await
    }

    async fn press_keycode(&self, keycode: u32) -> Result<(), WadriveError> {
        self.with_session(|d| async move { d.press_keycode(keycode).await })
            .await
    }

    async fn back(&self) -> Result<(), WadriveError> {
        self.with_session(|d| async move { d.back().await }).await
    }

    async fn tap(&self, point: Point) -> Result<(), WadriveError> {
        self.with_session(|d| async move { d.tap(point).await })
            .await
    }

    async fn swipe(
        &self,
        from: Point,
        to: Point,
        duration: Duration,
    ) -> Result<(), WadriveError> {
        self.with_session(|d| async move { d.swipe(from, to, duration).await })
            .await
    }

    async fn swipe_element(
        &self,
        element: &ElementId,
        direction: SwipeDirection,
        percent: f64,
    ) -> Result<(), WadriveError> {
        self.with_session(|d| async move { d.swipe_element(element, direction, percent).await })
            .await
    }

    async fn activate_app(&self, package: &str) -> Result<(), WadriveError> {
        self.with_session(|d| async move { d.activate_app(package).await })
            .await
    }

    async fn start_activity(&self, package: &str, activity: &str) -> Result<(), WadriveError> {
        self.with_session(|d| async move { d.start_activity(package, activity).await })
            .await
    }

    async fn push_file(&self, device_path: &str, data: &[u8]) -> Result<(), WadriveError> {
        self.with_session(|d| async move { d.push_file(device_path, data).await })
            .await
    }

    async fn pull_file(&self, device_path: &str) -> Result<Vec<u8>, WadriveError> {
        self.with_session(|d| async move { d.pull_file(device_path).await })
            .await
    }

    /// Close the live session. Idempotent; later commands fail with `SessionLost`.
    async fn quit(&self) -> Result<(), WadriveError> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        let taken = self.session.lock().await.take();
        match taken {
            Some(session) => session.quit().await,
            None => Ok(()),
        }
    }

    fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }
}
