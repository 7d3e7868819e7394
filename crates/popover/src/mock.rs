//! Recording mock host for tests.
//!
//! Mirrors the real host contract with settable state and a call log,
//! so lifecycle behavior can be asserted without a toolkit binding.

use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
};

use parking_lot::Mutex;
use popover_geom::{Offset, Rect, Viewport};

use crate::host::{
    EventCallback, EventSource, PopoverHandle, Subscription, TargetHandle, ViewportSource,
    WindowEvent,
};

/// Mock DOM-like element with a settable frame and a call log.
#[derive(Clone)]
pub struct MockElement {
    /// Current bounding box.
    frame: Arc<Mutex<Rect>>,
    /// Whether the element is attached to the document.
    attached: Arc<AtomicBool>,
    /// Classes currently on the element.
    classes: Arc<Mutex<Vec<String>>>,
    /// Every offset applied, in order.
    offsets: Arc<Mutex<Vec<Offset>>>,
    /// Observable side effects, in order.
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockElement {
    /// Element with the given bounding box, initially detached.
    pub fn new(frame: Rect) -> Self {
        Self {
            frame: Arc::new(Mutex::new(frame)),
            attached: Arc::new(AtomicBool::new(false)),
            classes: Arc::new(Mutex::new(Vec::new())),
            offsets: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Replace the element's bounding box.
    pub fn set_frame(&self, frame: Rect) {
        *self.frame.lock() = frame;
    }

    /// Whether the element is currently attached.
    pub fn is_attached(&self) -> bool {
        self.attached.load(Ordering::SeqCst)
    }

    /// Whether the element currently carries `class`.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.lock().iter().any(|c| c == class)
    }

    /// All offsets applied so far.
    pub fn applied_offsets(&self) -> Vec<Offset> {
        self.offsets.lock().clone()
    }

    /// The most recently applied offset.
    pub fn last_offset(&self) -> Option<Offset> {
        self.offsets.lock().last().copied()
    }

    /// Forget previously applied offsets.
    pub fn clear_offsets(&self) {
        self.offsets.lock().clear();
    }

    /// Number of logged calls matching `name`.
    pub fn call_count(&self, name: &str) -> usize {
        self.calls.lock().iter().filter(|c| *c == name).count()
    }

    /// Append to the call log.
    fn note(&self, call: &str) {
        self.calls.lock().push(call.to_string());
    }
}

impl TargetHandle for MockElement {
    fn frame(&self) -> Rect {
        *self.frame.lock()
    }
}

impl PopoverHandle for MockElement {
    fn attach(&self) {
        self.attached.store(true, Ordering::SeqCst);
        self.note("attach");
    }

    fn detach(&self) {
        // Detaching a detached element is a no-op per the contract.
        if self.attached.swap(false, Ordering::SeqCst) {
            self.note("detach");
        }
    }

    fn add_class(&self, class: &str) {
        let mut classes = self.classes.lock();
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
        }
    }

    fn remove_class(&self, class: &str) {
        self.classes.lock().retain(|c| c != class);
    }

    fn apply_offset(&self, offset: Offset) {
        self.offsets.lock().push(offset);
    }
}

/// Mock viewport with settable scroll state and dimensions.
#[derive(Clone)]
pub struct MockViewport {
    /// Current viewport state.
    state: Arc<Mutex<Viewport>>,
}

impl MockViewport {
    /// Viewport with the given initial state.
    pub fn new(state: Viewport) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Replace the viewport state.
    pub fn set(&self, state: Viewport) {
        *self.state.lock() = state;
    }
}

impl ViewportSource for MockViewport {
    fn viewport(&self) -> Viewport {
        *self.state.lock()
    }
}

/// Registered mock callbacks keyed by subscription id.
type CallbackMap = HashMap<WindowEvent, Vec<(u64, Arc<dyn Fn() + Send + Sync>)>>;

/// Mock window-event registry with manual firing.
#[derive(Clone, Default)]
pub struct MockEvents {
    /// Live registrations.
    subs: Arc<Mutex<CallbackMap>>,
    /// Next subscription id.
    next_id: Arc<AtomicU64>,
}

impl MockEvents {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live registrations for `event`.
    pub fn subscriber_count(&self, event: WindowEvent) -> usize {
        self.subs.lock().get(&event).map_or(0, Vec::len)
    }

    /// Invoke every callback registered for `event`.
    pub fn fire(&self, event: WindowEvent) {
        let callbacks: Vec<_> = self
            .subs
            .lock()
            .get(&event)
            .map(|v| v.iter().map(|(_, cb)| cb.clone()).collect())
            .unwrap_or_default();
        for cb in callbacks {
            cb();
        }
    }
}

impl EventSource for MockEvents {
    fn subscribe(&self, event: WindowEvent, callback: EventCallback) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.subs
            .lock()
            .entry(event)
            .or_default()
            .push((id, Arc::from(callback)));

        let subs = self.subs.clone();
        Subscription::new(move || {
            if let Some(list) = subs.lock().get_mut(&event) {
                list.retain(|(sid, _)| *sid != id);
            }
        })
    }
}
