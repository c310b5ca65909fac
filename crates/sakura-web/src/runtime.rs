//! Page runtime: the HAL plus every registered component
//!
//! Browser callbacks hold only a [`Weak`] reference to the runtime and feed
//! their events through [`dispatch`].

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use sakura_rain::{PageEvent, RainContext};

use crate::hal::{WebHal, WebSession};
use crate::startup;
use crate::util::log;

pub(crate) type WebEvent = PageEvent<WebSession>;
pub(crate) type RuntimeRef = Weak<RefCell<PageRuntime>>;

/// Everything that lives for the page's lifetime
pub(crate) struct PageRuntime {
    pub(crate) hal: WebHal,
    pub(crate) rain: RainContext<WebHal>,
    started: bool,
}

impl PageRuntime {
    /// Create the runtime inside an `Rc` so the HAL can point back at it
    pub(crate) fn create() -> Rc<RefCell<Self>> {
        Rc::new_cyclic(|weak: &RuntimeRef| {
            RefCell::new(Self {
                hal: WebHal::new(weak.clone()),
                rain: RainContext::new(),
                started: false,
            })
        })
    }

    /// Run the startup registrations once
    pub(crate) fn start(&mut self) {
        if self.started {
            log("[sakura] Page already started");
            return;
        }
        self.started = true;
        startup::run(self);
    }

    pub(crate) fn is_started(&self) -> bool {
        self.started
    }

    /// Route one event to the components
    pub(crate) fn handle_event(&mut self, event: WebEvent) {
        let Self { hal, rain, .. } = self;
        rain.handle_event(hal, event);
    }

    /// Tear every component down; `start` may run again afterwards
    pub(crate) fn shutdown(&mut self) {
        let Self { hal, rain, .. } = self;
        rain.shutdown(hal);
        self.started = false;
    }
}

/// Deliver an event from a browser callback.
///
/// Dropped if the runtime is gone or already borrowed.
pub(crate) fn dispatch(runtime: &RuntimeRef, event: WebEvent) {
    let Some(runtime) = runtime.upgrade() else {
        return;
    };
    let Ok(mut runtime) = runtime.try_borrow_mut() else {
        log("[sakura] Runtime busy, dropping event");
        return;
    };
    runtime.handle_event(event);
}
