//! W3C WebDriver / Appium wire types and request builders.

use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use wadrive_core::{
    config::AppiumConfig, error::WadriveError, geometry::Point, traits::ElementId,
};

/// W3C element reference key.
pub(crate) const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";
/// Pre-W3C (JSONWP) element reference key, still sent by some drivers.
const LEGACY_ELEMENT_KEY: &str = "ELEMENT";

/// Every WebDriver response wraps its payload in `value`.
#[derive(Debug, Deserialize)]
pub(crate) struct WireResponse {
    #[serde(default)]
    pub value: Value,
}

/// Error payload inside `value`.
#[derive(Debug, Deserialize)]
pub(crate) struct WireError {
    pub error: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NewSession {
    #[serde(rename = "sessionId")]
    pub session_id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WindowRect {
    pub width: f64,
    pub height: f64,
}

/// Message fragments that mean the UiAutomator2 server on the device died,
/// even though the Appium server answers with a generic error code.
const DEAD_SERVER_HINTS: &[&str] = &[
    "instrumentation process is not running",
    "cannot be proxied to uiautomator2 server",
    "socket hang up",
    "session is either terminated or not started",
    "econnrefused",
    "econnreset",
];

/// Map a WebDriver error code and message onto the error taxonomy.
pub(crate) fn classify_error(code: &str, message: &str) -> WadriveError {
    let lower = message.to_lowercase();
    if code == "invalid session id" || DEAD_SERVER_HINTS.iter().any(|h| lower.contains(h)) {
        return WadriveError::SessionLost(format!("{code}: {message}"));
    }
    match code {
        "no such element" => WadriveError::NoSuchElement(message.to_string()),
        "stale element reference" => WadriveError::StaleElement(message.to_string()),
        "timeout" | "script timeout" => WadriveError::Timeout(message.to_string()),
        _ => WadriveError::Protocol(format!("{code}: {message}")),
    }
}

/// Pull the error out of a response `value`, if it holds one.
pub(crate) fn error_from_value(value: &Value) -> Option<WadriveError> {
    let err: WireError = serde_json::from_value(value.clone()).ok()?;
    Some(classify_error(&err.error, &err.message))
}

/// Extract an element reference from a `find element` response value.
pub(crate) fn parse_element(value: &Value) -> Result<ElementId, WadriveError> {
    value
        .get(ELEMENT_KEY)
        .or_else(|| value.get(LEGACY_ELEMENT_KEY))
        .and_then(Value::as_str)
        .map(|id| ElementId(id.to_string()))
        .ok_or_else(|| WadriveError::Protocol(format!("no element reference in {value}")))
}

/// Extract element references from a `find elements` response value.
pub(crate) fn parse_elements(value: &Value) -> Result<Vec<ElementId>, WadriveError> {
    value
        .as_array()
        .ok_or_else(|| WadriveError::Protocol(format!("expected element array, got {value}")))?
        .iter()
        .map(parse_element)
        .collect()
}

/// New-session request body for a UiAutomator2 Android session.
///
/// `launch` is an optional `(package, activity)` the server starts with the session.
pub fn capabilities(cfg: &AppiumConfig, launch: Option<(&str, &str)>) -> Value {
    let mut caps = json!({
        "platformName": "Android",
        "appium:automationName": "UiAutomator2",
        "appium:deviceName": cfg.device_name,
        "appium:noReset": true,
        "appium:fullReset": false,
        "appium:newCommandTimeout": cfg.new_command_timeout_secs,
        "appium:uiautomator2ServerLaunchTimeout": cfg.server_launch_timeout_ms,
        "appium:uiautomator2ServerInstallTimeout": cfg.server_install_timeout_ms,
    });
    if let Some(map) = caps.as_object_mut() {
        if !cfg.udid.is_empty() {
            map.insert("appium:udid".into(), json!(cfg.udid));
        }
        if !cfg.platform_version.is_empty() {
            map.insert("appium:platformVersion".into(), json!(cfg.platform_version));
        }
        if let Some((package, activity)) = launch {
            map.insert("appium:appPackage".into(), json!(package));
            map.insert("appium:appActivity".into(), json!(activity));
        }
    }
    json!({
        "capabilities": {
            "alwaysMatch": caps,
            "firstMatch": [{}],
        }
    })
}

fn pointer_sequence(steps: Vec<Value>) -> Value {
    json!({
        "actions": [{
            "type": "pointer",
            "id": "finger1",
            "parameters": { "pointerType": "touch" },
            "actions": steps,
        }]
    })
}

/// W3C actions for a single tap.
pub(crate) fn tap_actions(point: Point) -> Value {
    pointer_sequence(vec![
        json!({ "type": "pointerMove", "duration": 0, "x": point.x, "y": point.y }),
        json!({ "type": "pointerDown", "button": 0 }),
        json!({ "type": "pause", "duration": 100 }),
        json!({ "type": "pointerUp", "button": 0 }),
    ])
}

/// W3C actions for a press-move-release swipe.
pub(crate) fn swipe_actions(from: Point, to: Point, duration: Duration) -> Value {
    pointer_sequence(vec![
        json!({ "type": "pointerMove", "duration": 0, "x": from.x, "y": from.y }),
        json!({ "type": "pointerDown", "button": 0 }),
        json!({ "type": "pointerMove", "duration": duration.as_millis() as u64, "x": to.x, "y": to.y }),
        json!({ "type": "pointerUp", "button": 0 }),
    ])
}
