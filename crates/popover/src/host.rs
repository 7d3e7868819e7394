//! Capability seams over the host UI layer.
//!
//! The component never touches a concrete toolkit. Targets and popover
//! elements are reached through these traits, so the same positioning
//! logic runs against any binding that can report bounding boxes and
//! toggle classes.

use std::fmt;

use popover_geom::{Offset, Rect, Viewport};

/// Window-level notifications the popover repositions on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowEvent {
    /// The window was resized.
    Resize,
    /// The document scrolled.
    Scroll,
}

/// Callback invoked when a subscribed window event fires.
pub type EventCallback = Box<dyn Fn() + Send + Sync>;

/// Handle to an active window-event subscription.
///
/// The registration is released when the handle is dropped, so a
/// component dropped without an explicit `hide()` still removes its
/// listeners.
pub struct Subscription {
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    /// Wrap the closure that removes the registration.
    pub fn new(release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

/// Geometry query shared by anchor targets and popover elements.
pub trait TargetHandle: Send + Sync {
    /// Current bounding box in document coordinates.
    fn frame(&self) -> Rect;
}

/// Operations the popover element itself must support.
///
/// The element is externally owned; the component never creates or
/// destroys it, only attaches, detaches, and styles it.
pub trait PopoverHandle: TargetHandle {
    /// Insert the element into the document.
    fn attach(&self);
    /// Remove the element from the document. Must be a no-op when the
    /// element is not attached.
    fn detach(&self);
    /// Add a named class to the element.
    fn add_class(&self, class: &str);
    /// Remove a named class from the element.
    fn remove_class(&self, class: &str);
    /// Apply an absolute position to the element.
    fn apply_offset(&self, offset: Offset);
}

/// Source of the current viewport state. Queried fresh on every
/// computation, never cached.
pub trait ViewportSource: Send + Sync {
    /// Scroll offsets and visible dimensions of the window.
    fn viewport(&self) -> Viewport;
}

/// Window-level event registry.
pub trait EventSource: Send + Sync {
    /// Register `callback` for `event`; the registration lives as long
    /// as the returned [`Subscription`].
    fn subscribe(&self, event: WindowEvent, callback: EventCallback) -> Subscription;
}
