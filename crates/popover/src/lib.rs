//! Anchored popover component.
//!
//! A [`Popover`] keeps an externally owned floating element placed
//! against a target element while visible: [`Popover::show`] attaches
//! the element and starts a 25 ms reposition cycle plus window
//! resize/scroll listeners, [`Popover::hide`] tears all of that down.
//! The geometry itself lives in [`popover_geom`]; this crate owns the
//! lifecycle and scheduling around it.
//!
//! The host toolkit is reached only through capability traits
//! ([`TargetHandle`], [`PopoverHandle`], [`ViewportSource`],
//! [`EventSource`]), so the component runs against any binding.

use std::{
    sync::{
        Arc, Weak,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use parking_lot::Mutex;
use popover_geom::{Anchor, Offset, compute_offset, suggest_anchor};
use tracing::{debug, error};

mod error;
mod host;
pub mod mock;
mod ticker;

pub use error::{Error, Result};
pub use host::{
    EventCallback, EventSource, PopoverHandle, Subscription, TargetHandle, ViewportSource,
    WindowEvent,
};
pub use popover_geom as geom;

use ticker::Ticker;

/// Cadence of the periodic reposition cycle.
const UPDATE_INTERVAL: Duration = Duration::from_millis(25);

/// Class added one tick after attach so the host can transition from
/// the pre-visible style snapshot.
const VISIBLE_CLASS: &str = "is-visible";

/// Construction options for a [`Popover`].
pub struct PopoverConfig {
    /// Initial anchor direction; defaults to `"east"` when `None`.
    /// Accepted unchecked, like [`Popover::position`].
    pub position: Option<String>,
    /// The element the popover is anchored against.
    pub target: Arc<dyn TargetHandle>,
    /// The popover element itself.
    pub el: Arc<dyn PopoverHandle>,
    /// Viewport state queries.
    pub viewport: Arc<dyn ViewportSource>,
    /// Window-level resize/scroll notifications.
    pub events: Arc<dyn EventSource>,
}

/// Shared component state.
struct Inner {
    /// Configured anchor direction, stored raw; parsed per reposition
    /// so an invalid value surfaces from the positioning path rather
    /// than from the setter.
    anchor: Mutex<String>,
    /// Anchor target; externally owned.
    target: Arc<dyn TargetHandle>,
    /// Popover element; externally owned.
    el: Arc<dyn PopoverHandle>,
    /// Viewport queries, read fresh per computation.
    viewport: Arc<dyn ViewportSource>,
    /// Window-event registry.
    events: Arc<dyn EventSource>,
    /// Whether the popover is currently shown.
    visible: AtomicBool,
    /// Live resize/scroll registrations; dropped on hide.
    subs: Mutex<Vec<Subscription>>,
    /// Periodic reposition cycle.
    ticker: Ticker,
}

impl Inner {
    /// Offset for `anchor` from the current target and element frames.
    fn offset_for(&self, anchor: Anchor) -> Offset {
        compute_offset(anchor, self.target.frame(), self.el.frame().size())
    }

    /// Flip suggestion for `offset` against the current viewport.
    fn suggested_for(&self, anchor: Anchor, offset: Offset) -> Option<Anchor> {
        suggest_anchor(anchor, offset, self.el.frame().size(), self.viewport.viewport())
    }

    /// Recompute the offset from current state and apply it.
    fn reposition(&self) -> Result<Offset> {
        let anchor: Anchor = self.anchor.lock().parse()?;
        let offset = self.offset_for(anchor);
        if let Some(flip) = self.suggested_for(anchor, offset) {
            // The auto-flip stays disabled; callers wanting it can act
            // on suggest_anchor themselves.
            debug!(current = %anchor, suggested = %flip, "placement clips the viewport");
        }
        self.el.apply_offset(offset);
        Ok(offset)
    }
}

/// Keeps a floating element positioned against a target while visible.
///
/// Cheap to clone; clones share state. Requires a tokio runtime for
/// [`Popover::show`], which spawns the update cycle.
#[derive(Clone)]
pub struct Popover {
    /// Shared state.
    inner: Arc<Inner>,
}

impl Popover {
    /// Build a hidden popover from `config`.
    pub fn new(config: PopoverConfig) -> Self {
        let anchor = config
            .position
            .unwrap_or_else(|| Anchor::default().to_string());
        Self {
            inner: Arc::new(Inner {
                anchor: Mutex::new(anchor),
                target: config.target,
                el: config.el,
                viewport: config.viewport,
                events: config.events,
                visible: AtomicBool::new(false),
                subs: Mutex::new(Vec::new()),
                ticker: Ticker::new(),
            }),
        }
    }

    /// Set the anchor direction. Accepted unchecked; an invalid value
    /// fails later, inside the next reposition. Takes effect on that
    /// reposition, which this call does not itself trigger.
    pub fn position(&self, direction: impl Into<String>) {
        *self.inner.anchor.lock() = direction.into();
    }

    /// Whether the popover is currently shown.
    pub fn is_visible(&self) -> bool {
        self.inner.visible.load(Ordering::SeqCst)
    }

    /// Offset that placing the popover at `direction` would produce,
    /// from the current target and element frames.
    pub fn offset(&self, direction: &str) -> Result<Offset> {
        Ok(self.inner.offset_for(direction.parse()?))
    }

    /// Flip suggestion for `offset` under `direction`, or `None` when
    /// the placement fits the current viewport.
    pub fn suggested(&self, direction: &str, offset: Offset) -> Result<Option<Anchor>> {
        Ok(self.inner.suggested_for(direction.parse()?, offset))
    }

    /// Recompute and apply the popover's offset from current state.
    ///
    /// Runs on show, on every update tick, and on window resize and
    /// scroll. Safe to call directly; repeated calls with unchanged
    /// inputs apply the same offset.
    pub fn reposition(&self) -> Result<Offset> {
        self.inner.reposition()
    }

    /// Attach the popover and start keeping it positioned.
    ///
    /// Attaches the element, adds the anchor class, repositions once
    /// synchronously (errors propagate), then registers resize/scroll
    /// listeners and starts the 25 ms update cycle. The `is-visible`
    /// class is added one scheduler tick later.
    pub fn show(&self) -> Result<()> {
        let inner = &self.inner;
        let anchor_class = inner.anchor.lock().clone();
        inner.el.attach();
        inner.el.add_class(&anchor_class);
        inner.reposition()?;
        debug!(anchor = %anchor_class, "popover_show");

        // Deferred so the host's transition starts from the attached,
        // pre-visible style.
        let el = Arc::clone(&inner.el);
        tokio::spawn(async move {
            el.add_class(VISIBLE_CLASS);
        });

        {
            let mut subs = inner.subs.lock();
            subs.clear();
            for event in [WindowEvent::Resize, WindowEvent::Scroll] {
                let weak = Arc::downgrade(inner);
                subs.push(inner.events.subscribe(
                    event,
                    Box::new(move || {
                        if let Some(state) = weak.upgrade()
                            && let Err(err) = state.reposition()
                        {
                            // No error channel in the event path.
                            error!(%err, ?event, "reposition failed");
                        }
                    }),
                ));
            }
        }

        inner.visible.store(true, Ordering::SeqCst);
        let weak: Weak<Inner> = Arc::downgrade(inner);
        inner
            .ticker
            .start(UPDATE_INTERVAL, UPDATE_INTERVAL, move || {
                let Some(state) = weak.upgrade() else {
                    return false;
                };
                if !state.visible.load(Ordering::SeqCst) {
                    return false;
                }
                match state.reposition() {
                    Ok(_) => true,
                    Err(err) => {
                        error!(%err, "reposition failed, stopping updates");
                        false
                    }
                }
            });
        Ok(())
    }

    /// Detach the popover and stop repositioning.
    ///
    /// Safe to call when already hidden: the element contract makes the
    /// repeated detach and class removal no-ops.
    pub fn hide(&self) {
        let inner = &self.inner;
        inner.subs.lock().clear();
        inner.visible.store(false, Ordering::SeqCst);
        inner.ticker.stop();
        inner.el.detach();
        inner.el.remove_class(VISIBLE_CLASS);
        debug!("popover_hide");
    }
}
