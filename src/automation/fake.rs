//! Scripted in-memory `Device` for flow tests.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;
use std::time::Duration;
use wadrive_core::{
    error::WadriveError,
    geometry::{Point, Rect, WindowSize},
    locator::Locator,
    traits::{Device, ElementId, SwipeDirection},
};

/// One recorded device command.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Click(String),
    Clear(String),
    Keys(String, String),
    Key(u32),
    Back,
    Tap(Point),
    Swipe(Point, Point, u128),
    SwipeElement(String),
    Activate(String),
    StartActivity(String, String),
    Push(String, usize),
    Pull(String),
    Quit,
}

#[derive(Default)]
struct Screen {
    elements: HashMap<Locator, Vec<ElementId>>,
    children: HashMap<(ElementId, Locator), Vec<ElementId>>,
}

struct State {
    base: Screen,
    /// Screens reached by scrolling; upward swipes move through them.
    pages: Vec<Screen>,
    swipes: usize,
    swipes_per_page: usize,
    texts: HashMap<ElementId, String>,
    rects: HashMap<ElementId, Rect>,
    hidden: HashSet<ElementId>,
    files: HashMap<String, Vec<u8>>,
    failures: HashMap<&'static str, VecDeque<WadriveError>>,
    calls: Vec<Call>,
    window: WindowSize,
    generation: u64,
    bump_on_click: Option<ElementId>,
}

impl State {
    fn page(&self) -> Option<&Screen> {
        if self.pages.is_empty() {
            return None;
        }
        let idx = (self.swipes / self.swipes_per_page.max(1)).min(self.pages.len() - 1);
        self.pages.get(idx)
    }

    fn lookup(&self, locator: &Locator) -> Vec<ElementId> {
        if let Some(hits) = self.page().and_then(|p| p.elements.get(locator)) {
            return hits.clone();
        }
        self.base.elements.get(locator).cloned().unwrap_or_default()
    }

    fn lookup_children(&self, parent: &ElementId, locator: &Locator) -> Vec<ElementId> {
        let key = (parent.clone(), locator.clone());
        if let Some(hits) = self.page().and_then(|p| p.children.get(&key)) {
            return hits.clone();
        }
        self.base.children.get(&key).cloned().unwrap_or_default()
    }

    fn screen_mut(&mut self, page: Option<usize>) -> &mut Screen {
        match page {
            None => &mut self.base,
            Some(idx) => {
                while self.pages.len() <= idx {
                    self.pages.push(Screen::default());
                }
                &mut self.pages[idx]
            }
        }
    }
}

pub struct FakeDevice {
    state: Mutex<State>,
}

impl FakeDevice {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                base: Screen::default(),
                pages: Vec::new(),
                swipes: 0,
                swipes_per_page: 1,
                texts: HashMap::new(),
                rects: HashMap::new(),
                hidden: HashSet::new(),
                files: HashMap::new(),
                failures: HashMap::new(),
                calls: Vec::new(),
                window: WindowSize::new(1080, 2400),
                generation: 0,
                bump_on_click: None,
            }),
        }
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut State) -> T) -> T {
        let mut guard = self.state.lock().unwrap();
        f(&mut guard)
    }

    /// Element visible on every screen.
    pub fn add(&self, locator: Locator, id: &str) {
        self.add_on(None, locator, id);
    }

    /// Element on one scroll page (`None` = every screen).
    pub fn add_on(&self, page: Option<usize>, locator: Locator, id: &str) {
        self.with_state(|s| {
            s.screen_mut(page)
                .elements
                .entry(locator)
                .or_default()
                .push(ElementId(id.into()));
        });
    }

    pub fn add_child(&self, parent: &str, locator: Locator, id: &str) {
        self.add_child_on(None, parent, locator, id);
    }

    pub fn add_child_on(&self, page: Option<usize>, parent: &str, locator: Locator, id: &str) {
        self.with_state(|s| {
            s.screen_mut(page)
                .children
                .entry((ElementId(parent.into()), locator))
                .or_default()
                .push(ElementId(id.into()));
        });
    }

    pub fn set_text(&self, id: &str, text: &str) {
        self.with_state(|s| s.texts.insert(ElementId(id.into()), text.into()));
    }

    pub fn set_rect(&self, id: &str, x: f64, y: f64, width: f64, height: f64) {
        self.with_state(|s| {
            s.rects.insert(
                ElementId(id.into()),
                Rect {
                    x,
                    y,
                    width,
                    height,
                },
            )
        });
    }

    pub fn hide(&self, id: &str) {
        self.with_state(|s| s.hidden.insert(ElementId(id.into())));
    }

    pub fn set_swipes_per_page(&self, n: usize) {
        self.with_state(|s| s.swipes_per_page = n);
    }

    /// Queue an error for the next call of `op` (the `Device` method name).
    pub fn fail(&self, op: &'static str, err: WadriveError) {
        self.with_state(|s| s.failures.entry(op).or_default().push_back(err));
    }

    /// Clicking `id` simulates a session recreation.
    pub fn bump_generation_on_click(&self, id: &str) {
        self.with_state(|s| s.bump_on_click = Some(ElementId(id.into())));
    }

    pub fn put_file(&self, path: &str, data: &[u8]) {
        self.with_state(|s| s.files.insert(path.into(), data.to_vec()));
    }

    pub fn file(&self, path: &str) -> Option<Vec<u8>> {
        self.with_state(|s| s.files.get(path).cloned())
    }

    pub fn calls(&self) -> Vec<Call> {
        self.with_state(|s| s.calls.clone())
    }

    pub fn clicked(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Click(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    pub fn typed(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Keys(_, text) => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn taps(&self) -> Vec<Point> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Tap(p) => Some(p),
                _ => None,
            })
            .collect()
    }

    fn record(&self, op: &'static str, call: Call) -> Result<(), WadriveError> {
        self.with_state(|s| {
            if let Some(err) = s.failures.get_mut(op).and_then(VecDeque::pop_front) {
                return Err(err);
            }
            s.calls.push(call);
            Ok(())
        })
    }

    fn check(&self, op: &'static str) -> Result<(), WadriveError> {
        self.with_state(|s| match s.failures.get_mut(op).and_then(VecDeque::pop_front) {
            Some(err) => Err(err),
            None => Ok(()),
        })
    }
}

#[async_trait]
impl Device for FakeDevice {
    async fn find_element(&self, locator: &Locator) -> Result<ElementId, WadriveError> {
        self.check("find_element")?;
        self.with_state(|s| s.lookup(locator).into_iter().next())
            .ok_or_else(|| WadriveError::NoSuchElement(locator.to_string()))
    }

    async fn find_elements(&self, locator: &Locator) -> Result<Vec<ElementId>, WadriveError> {
        self.check("find_elements")?;
        Ok(self.with_state(|s| s.lookup(locator)))
    }

    async fn find_child(
        &self,
        parent: &ElementId,
        locator: &Locator,
    ) -> Result<ElementId, WadriveError> {
        self.check("find_child")?;
        self.with_state(|s| s.lookup_children(parent, locator).into_iter().next())
            .ok_or_else(|| WadriveError::NoSuchElement(format!("{parent} > {locator}")))
    }

    async fn find_children(
        &self,
        parent: &ElementId,
        locator: &Locator,
    ) -> Result<Vec<ElementId>, WadriveError> {
        self.check("find_children")?;
        Ok(self.with_state(|s| s.lookup_children(parent, locator)))
    }

    async fn click(&self, element: &ElementId) -> Result<(), WadriveError> {
        self.record("click", Call::Click(element.to_string()))?;
        self.with_state(|s| {
            if s.bump_on_click.as_ref() == Some(element) {
                s.generation += 1;
            }
        });
        Ok(())
    }

    async fn clear(&self, element: &ElementId) -> Result<(), WadriveError> {
        self.record("clear", Call::Clear(element.to_string()))
    }

    async fn send_keys(&self, element: &ElementId, text: &str) -> Result<(), WadriveError> {
        self.record("send_keys", Call::Keys(element.to_string(), text.into()))
    }

    async fn text(&self, element: &ElementId) -> Result<String, WadriveError> {
        self.check("text")?;
        Ok(self.with_state(|s| s.texts.get(element).cloned().unwrap_or_default()))
    }

    async fn is_displayed(&self, element: &ElementId) -> Result<bool, WadriveError> {
        self.check("is_displayed")?;
        Ok(self.with_state(|s| !s.hidden.contains(element)))
    }

    async fn rect(&self, element: &ElementId) -> Result<Rect, WadriveError> {
        self.check("rect")?;
        self.with_state(|s| s.rects.get(element).copied())
            .ok_or_else(|| WadriveError::StaleElement(element.to_string()))
    }

    async fn window_size(&self) -> Result<WindowSize, WadriveError> {
        self.check("window_size")?;
        Ok(self.with_state(|s| s.window))
    }

    async fn press_keycode(&self, keycode: u32) -> Result<(), WadriveError> {
        self.record("press_keycode", Call::Key(keycode))
    }

    async fn back(&self) -> Result<(), WadriveError> {
        self.record("back", Call::Back)
    }

    async fn tap(&self, point: Point) -> Result<(), WadriveError> {
        self.record("tap", Call::Tap(point))
    }

    async fn swipe(&self, from: Point, to: Point, duration: Duration) -> Result<(), WadriveError> {
        self.record("swipe", Call::Swipe(from, to, duration.as_millis()))?;
        if from.y > to.y {
            self.with_state(|s| s.swipes += 1);
        }
        Ok(())
    }

    async fn swipe_element(
        &self,
        element: &ElementId,
        direction: SwipeDirection,
        _percent: f64,
    ) -> Result<(), WadriveError> {
        self.record("swipe_element", Call::SwipeElement(element.to_string()))?;
        if direction == SwipeDirection::Up {
            self.with_state(|s| s.swipes += 1);
        }
        Ok(())
    }

    async fn activate_app(&self, package: &str) -> Result<(), WadriveError> {
        self.record("activate_app", Call::Activate(package.into()))
    }

    async fn start_activity(&self, package: &str, activity: &str) -> Result<(), WadriveError> {
        self.record(
            "start_activity",
            Call::StartActivity(package.into(), activity.into()),
        )
    }

    async fn push_file(&self, device_path: &str, data: &[u8]) -> Result<(), WadriveError> {
        self.record("push_file", Call::Push(device_path.into(), data.len()))?;
        self.put_file(device_path, data);
        Ok(())
    }

    async fn pull_file(&self, device_path: &str) -> Result<Vec<u8>, WadriveError> {
        self.record("pull_file", Call::Pull(device_path.into()))?;
        self.file(device_path)
            .ok_or_else(|| WadriveError::Protocol(format!("no file at {device_path}")))
    }

    async fn quit(&self) -> Result<(), WadriveError> {
        self.record("quit", Call::Quit)
    }

    fn generation(&self) -> u64 {
        self.with_state(|s| s.generation)
    }
}
