//! Test doubles for the page HAL
//!
//! [`MockHal`] simulates the browser deterministically: timers, frames and
//! async requests stay pending until the test completes them, and every
//! render session records what was done to it.

mod mock_hal;

pub use mock_hal::{
    png_bytes, MockEvent, MockHal, MockSession, SessionRecord, SessionRequest, Teardown,
};
