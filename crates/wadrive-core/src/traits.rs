use crate::{
    error::WadriveError,
    geometry::{Point, Rect, WindowSize},
    locator::Locator,
};
use async_trait::async_trait;
use std::time::Duration;

/// Opaque handle to an element inside the current automation session.
///
/// Handles die with the session and go stale when the view is redrawn.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementId(pub String);

impl ElementId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Direction for element swipe gestures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    Up,
    Down,
    Left,
    Right,
}

impl SwipeDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// Android key codes used by the automation flows.
pub mod keycode {
    pub const HOME: u32 = 3;
    pub const BACK: u32 = 4;
    pub const WAKEUP: u32 = 224;
}

/// Automation Device trait. The hands.
///
/// A remote-controlled handle that drives taps, swipes and text entry on a
/// mobile device. The Appium session implements it; tests use fakes.
#[async_trait]
pub trait Device: Send + Sync {
    /// Find the first element matching the locator.
    async fn find_element(&self, locator: &Locator) -> Result<ElementId, WadriveError>;

    /// Find every element matching the locator (possibly none).
    async fn find_elements(&self, locator: &Locator) -> Result<Vec<ElementId>, WadriveError>;

    /// Find the first match inside `parent`.
    async fn find_child(
        &self,
        parent: &ElementId,
        locator: &Locator,
    ) -> Result<ElementId, WadriveError>;

    /// Find every match inside `parent`.
    async fn find_children(
        &self,
        parent: &ElementId,
        locator: &Locator,
    ) -> Result<Vec<ElementId>, WadriveError>;

    async fn click(&self, element: &ElementId) -> Result<(), WadriveError>;

    async fn clear(&self, element: &ElementId) -> Result<(), WadriveError>;

    async fn send_keys(&self, element: &ElementId, text: &str) -> Result<(), WadriveError>;

    async fn text(&self, element: &ElementId) -> Result<String, WadriveError>;

    async fn is_displayed(&self, element: &ElementId) -> Result<bool, WadriveError>;

    async fn rect(&self, element: &ElementId) -> Result<Rect, WadriveError>;

    async fn window_size(&self) -> Result<WindowSize, WadriveError>;

    async fn press_keycode(&self, keycode: u32) -> Result<(), WadriveError>;

    /// System back navigation.
    async fn back(&self) -> Result<(), WadriveError>;

    /// Single-finger tap at a screen coordinate.
    async fn tap(&self, point: Point) -> Result<(), WadriveError>;

    /// Press at `from`, move to `to` over `duration`, release.
    async fn swipe(&self, from: Point, to: Point, duration: Duration)
        -> Result<(), WadriveError>;

    /// Swipe gesture anchored on an element; `percent` is of the element size.
    async fn swipe_element(
        &self,
        element: &ElementId,
        direction: SwipeDirection,
        percent: f64,
    ) -> Result<(), WadriveError>;

    async fn activate_app(&self, package: &str) -> Result<(), WadriveError>;

    async fn start_activity(&self, package: &str, activity: &str) -> Result<(), WadriveError>;

    /// Write `data` to `device_path` on the device.
    async fn push_file(&self, device_path: &str, data: &[u8]) -> Result<(), WadriveError>;

    /// Read `device_path` from the device.
    async fn pull_file(&self, device_path: &str) -> Result<Vec<u8>, WadriveError>;

    /// End the session. Further calls fail.
    async fn quit(&self) -> Result<(), WadriveError>;

    /// Bumped every time the underlying session is recreated.
    ///
    /// App state (unlocked screen, foreground app) does not survive a new
    /// session, so callers compare generations to know when to redo setup.
    fn generation(&self) -> u64 {
        0
    }
}
