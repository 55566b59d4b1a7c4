//! A live Appium session and its `Device` implementation.

use crate::types::{
    error_from_value, parse_element, parse_elements, swipe_actions, tap_actions, NewSession,
    WindowRect, WireResponse,
};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Method;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info, warn};
use wadrive_core::{
    error::WadriveError,
    geometry::{Point, Rect, WindowSize},
    locator::Locator,
    traits::{Device, ElementId, SwipeDirection},
};

/// One automation session on an Appium server.
pub struct AppiumSession {
    client: reqwest::Client,
    base_url: String,
    session_id: String,
}

impl AppiumSession {
    /// Open a new session with the given `POST /session` body.
    pub async fn create(
        client: reqwest::Client,
        server_url: &str,
        body: &Value,
    ) -> Result<Self, WadriveError> {
        let base_url = server_url.trim_end_matches('/').to_string();
        let url = format!("{base_url}/session");
        let value = send(&client, Method::POST, &url, Some(body)).await?;
        let created: NewSession = serde_json::from_value(value)?;
        info!("appium session {} started", created.session_id);
        Ok(Self {
            client,
            base_url,
            session_id: created.session_id,
        })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    fn url(&self, path: &str) -> String {
        format!("{}/session/{}{path}", self.base_url, self.session_id)
    }

    async fn get(&self, path: &str) -> Result<Value, WadriveError> {
        send(&self.client, Method::GET, &self.url(path), None).await
    }

    async fn post(&self, path: &str, body: Value) -> Result<Value, WadriveError> {
        send(&self.client, Method::POST, &self.url(path), Some(&body)).await
    }

    /// Run an Appium `mobile:` extension command.
    async fn mobile(&self, command: &str, args: Value) -> Result<Value, WadriveError> {
        self.post(
            "/execute/sync",
            json!({ "script": format!("mobile: {command}"), "args": [args] }),
        )
        .await
    }
}

/// Send one WebDriver request and unwrap its `value`.
///
/// Transport failures mean the server or the device bridge went away, so they
/// surface as `SessionLost`.
async fn send(
    client: &reqwest::Client,
    method: Method,
    url: &str,
    body: Option<&Value>,
) -> Result<Value, WadriveError> {
    debug!("appium {method} {url}");
    let mut req = client.request(method.clone(), url);
    if let Some(b) = body {
        req = req.json(b);
    }
    let resp = req
        .send()
        .await
        .map_err(|e| WadriveError::SessionLost(format!("{method} {url} failed: {e}")))?;

    let status = resp.status();
    let wire: WireResponse = resp.json().await.map_err(|e| {
        WadriveError::Protocol(format!("{method} {url}: unreadable response ({status}): {e}"))
    })?;

    if let Some(err) = error_from_value(&wire.value) {
        return Err(err);
    }
    if !status.is_success() {
        return Err(WadriveError::Protocol(format!(
            "{method} {url}: HTTP {status}: {}",
            wire.value
        )));
    }
    Ok(wire.value)
}

fn element_path(element: &ElementId, suffix: &str) -> String {
    format!("/element/{}{suffix}", element.as_str())
}

fn find_body(locator: &Locator) -> Value {
    json!({ "using": locator.strategy(), "value": locator.value() })
}

#[async_trait]
impl Device for AppiumSession {
    async fn find_element(&self, locator: &Locator) -> Result<ElementId, WadriveError> {
        let value = self.post("/element", find_body(locator)).await?;
        parse_element(&value)
    }

    async fn find_elements(&self, locator: &Locator) -> Result<Vec<ElementId>, WadriveError> {
        let value = self.post("/elements", find_body(locator)).await?;
        parse_elements(&value)
    }

    async fn find_child(
        &self,
        parent: &ElementId,
        locator: &Locator,
    ) -> Result<ElementId, WadriveError> {
        let value = self
            .post(&element_path(parent, "/element"), find_body(locator))
            .await?;
        parse_element(&value)
    }

    async fn find_children(
        &self,
        parent: &ElementId,
        locator: &Locator,
    ) -> Result<Vec<ElementId>, WadriveError> {
        let value = self
            .post(&element_path(parent, "/elements"), find_body(locator))
            .await?;
        parse_elements(&value)
    }

    async fn click(&self, element: &ElementId) -> Result<(), WadriveError> {
        self.post(&element_path(element, "/click"), json!({})).await?;
        Ok(())
    }

    async fn clear(&self, element: &ElementId) -> Result<(), WadriveError> {
        self.post(&element_path(element, "/clear"), json!({})).await?;
        Ok(())
    }

    async fn send_keys(&self, element: &ElementId, text: &str) -> Result<(), WadriveError> {
        self.post(&element_path(element, "/value"), json!({ "text": text }))
            .await?;
        Ok(())
    }

    async fn text(&self, element: &ElementId) -> Result<String, WadriveError> {
        let value = self.get(&element_path(element, "/text")).await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    async fn is_displayed(&self, element: &ElementId) -> Result<bool, WadriveError> {
        let value = self.get(&element_path(element, "/displayed")).await?;
        Ok(value.as_bool().unwrap_or(false))
    }

    async fn rect(&self, element: &ElementId) -> Result<Rect, WadriveError> {
        let value = self.get(&element_path(element, "/rect")).await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn window_size(&self) -> Result<WindowSize, WadriveError> {
        let value = self.get("/window/rect").await?;
        let rect: WindowRect = serde_json::from_value(value)?;
        Ok(WindowSize::new(rect.width as i64, rect.height as i64))
    }

    async fn press_keycode(&self, keycode: u32) -> Result<(), WadriveError> {
        self.mobile("pressKey", json!({ "keycode": keycode })).await?;
        Ok(())
    }

    async fn back(&self) -> Result<(), WadriveError> {
        self.post("/back", json!({})).await?;
        Ok(())
    }

    async fn tap(&self, point: Point) -> Result<(), WadriveError> {
        self.post("/actions", tap_actions(point)).await?;
        Ok(())
    }

    async fn swipe(
        &self,
        from: Point,
        to: Point,
        duration: Duration,
    ) -> Result<(), WadriveError> {
        self.post("/actions", swipe_actions(from, to, duration))
            .await?;
        Ok(())
    }

    async fn swipe_element(
        &self,
        element: &ElementId,
        direction: SwipeDirection,
        percent: f64,
    ) -> Result<(), WadriveError> {
        self.mobile(
            "swipeGesture",
            json!({
                "elementId": element.as_str(),
                "direction": direction.as_str(),
                "percent": percent,
            }),
        )
        .await?;
        Ok(())
    }

    async fn activate_app(&self, package: &str) -> Result<(), WadriveError> {
        self.mobile("activateApp", json!({ "appId": package }))
            .await?;
        Ok(())
    }

    async fn start_activity(&self, package: &str, activity: &str) -> Result<(), WadriveError> {
        self.mobile(
            "startActivity",
            json!({ "intent": format!("{package}/{activity}") }),
        )
        .await?;
        Ok(())
    }

    async fn push_file(&self, device_path: &str, data: &[u8]) -> Result<(), WadriveError> {
        let payload = STANDARD.encode(data);
        self.mobile(
            "pushFile",
            json!({ "remotePath": device_path, "payload": payload }),
        )
        .await?;
        Ok(())
    }

    async fn pull_file(&self, device_path: &str) -> Result<Vec<u8>, WadriveError> {
        let value = self
            .mobile("pullFile", json!({ "remotePath": device_path }))
            .await?;
        let encoded = value.as_str().ok_or_else(|| {
            WadriveError::Protocol(format!("pullFile returned non-string value for {device_path}"))
        })?;
        STANDARD
            .decode(encoded)
            .map_err(|e| WadriveError::Protocol(format!("pullFile payload is not base64: {e}")))
    }

    async fn quit(&self) -> Result<(), WadriveError> {
        match send(&self.client, Method::DELETE, &self.url(""), None).await {
            Ok(_) => {
                info!("appium session {} closed", self.session_id);
                Ok(())
            }
            Err(e) => {
                warn!("closing appium session {} failed: {e}", self.session_id);
                Err(e)
            }
        }
    }
}
