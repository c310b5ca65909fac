//! Startup sequence
//!
//! Components are registered by an explicit, ordered list run once by
//! `SakuraPage::start()`.

use crate::runtime::PageRuntime;
use crate::util::log;

type Registration = fn(&mut PageRuntime);

/// Registrations in the order they run
const REGISTRATIONS: &[(&str, Registration)] = &[("rain", register_rain)];

pub(crate) fn run(runtime: &mut PageRuntime) {
    for (name, register) in REGISTRATIONS {
        log(&format!("[sakura] Registering {}", name));
        register(runtime);
    }
}

fn register_rain(runtime: &mut PageRuntime) {
    let PageRuntime { hal, rain, .. } = runtime;
    rain.register(hal);
}
