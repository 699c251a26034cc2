//! Hardware-independent core library for neolog
//!
//! neolog is a binary-bar watchface: the time is shown as three columns of
//! horizontal bars (hours, tens of minutes, minutes), with an optional status
//! bar carrying the date, a Bluetooth glyph and a battery gauge.
//!
//! This crate contains all platform-agnostic logic: time-to-bar encoding,
//! bar geometry, the status overlay, color-depth strategies, settings
//! persistence and the event-driven display manager.
//!
//! It is `#![no_std]` with `extern crate alloc` so it compiles on both
//! watch-class targets and desktop hosts (for the simulator and tests).

#![no_std]

extern crate alloc;

pub mod app_state;
pub mod color;
pub mod config;
pub mod display_manager;
pub mod framebuffer;
pub mod layer;
pub mod layout;
pub mod overlay;
pub mod storage;
pub mod time;
pub mod watchface;
