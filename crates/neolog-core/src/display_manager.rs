//! Display Manager for routing host events to the watchface
//!
//! This module provides an event-driven display management system that:
//! - Owns the display, the settings store and the clock
//! - Dispatches host events (minute tick, battery, Bluetooth, configuration)
//!   to the [`Watchface`]
//! - Renders only when the watchface is dirty, reading the clock at render time
//! - Receives events via a static channel, either awaited forever (`run`) or
//!   drained without blocking (`drain`)

use chrono::NaiveDateTime;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, Receiver, Sender};
use embedded_graphics::prelude::*;
use log::{debug, error, info};

use crate::app_state::WatchError;
use crate::color::ColorDepth;
use crate::config::ConfigMessage;
use crate::storage::SettingsStore;
use crate::time::HourPolicy;
use crate::watchface::Watchface;

/// Channel capacity for host events
pub const EVENT_CHANNEL_CAPACITY: usize = 8;

/// Something the host reports to the watchface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchEvent {
    /// The minute changed
    Tick,
    /// New battery charge, 0-100
    Battery(u8),
    /// Bluetooth connection changed
    Bluetooth(bool),
    /// Configuration message from the phone
    Config(ConfigMessage),
    /// Force a repaint
    Redraw,
}

pub type EventChannel = Channel<CriticalSectionRawMutex, WatchEvent, EVENT_CHANNEL_CAPACITY>;
pub type EventSender<'a> = Sender<'a, CriticalSectionRawMutex, WatchEvent, EVENT_CHANNEL_CAPACITY>;
pub type EventReceiver<'a> =
    Receiver<'a, CriticalSectionRawMutex, WatchEvent, EVENT_CHANNEL_CAPACITY>;

/// Global channel for host events
pub static EVENT_CHANNEL: EventChannel = Channel::new();

/// Wall-clock source
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// Clock stuck at one instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

impl<K: Clock> Clock for &K {
    fn now(&self) -> NaiveDateTime {
        (**self).now()
    }
}

/// Display manager that owns the display and the watchface
pub struct DisplayManager<D, P, S, K>
where
    D: DrawTarget<Color = P::Color>,
    P: ColorDepth,
    S: SettingsStore,
    K: Clock,
{
    display: D,
    watchface: Watchface<P>,
    store: S,
    clock: K,
}

impl<D, P, S, K> DisplayManager<D, P, S, K>
where
    D: DrawTarget<Color = P::Color>,
    P: ColorDepth,
    S: SettingsStore,
    K: Clock,
{
    /// Create a display manager, loading the watchface from `store`
    pub fn new(display: D, store: S, clock: K, hour_policy: HourPolicy) -> Self {
        let watchface = Watchface::load(&store, hour_policy);
        Self {
            display,
            watchface,
            store,
            clock,
        }
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    pub fn watchface(&self) -> &Watchface<P> {
        &self.watchface
    }

    pub fn watchface_mut(&mut self) -> &mut Watchface<P> {
        &mut self.watchface
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock_mut(&mut self) -> &mut K {
        &mut self.clock
    }

    /// Apply a configuration message, persisting it to the store
    pub fn apply_config(&mut self, message: &ConfigMessage) -> Result<(), WatchError> {
        self.watchface.apply_config(message, &mut self.store)
    }

    /// Route an event to the watchface without rendering
    pub fn handle_event(&mut self, event: WatchEvent) {
        debug!("Handling event: {:?}", event);
        match event {
            WatchEvent::Tick => self.watchface.on_tick(),
            WatchEvent::Battery(percent) => self.watchface.on_battery(percent),
            WatchEvent::Bluetooth(connected) => self.watchface.on_bluetooth(connected),
            WatchEvent::Config(message) => {
                if let Err(e) = self.apply_config(&message) {
                    error!("Configuration only partly persisted: {}", e);
                }
            }
            WatchEvent::Redraw => self.watchface.mark_dirty(),
        }
    }

    /// Render the watchface if needed
    ///
    /// Returns whether anything was drawn.
    pub fn render(&mut self) -> Result<bool, D::Error> {
        if !self.watchface.is_dirty() {
            return Ok(false);
        }

        let now = self.clock.now();
        self.watchface.draw(&mut self.display, now)?;
        self.watchface.mark_clean();
        Ok(true)
    }

    /// Handle one event, then render if needed
    pub fn process_event(&mut self, event: WatchEvent) -> Result<bool, D::Error> {
        self.handle_event(event);
        self.render()
    }

    /// Process every pending event without waiting
    ///
    /// Renders at most once, after the last event. Returns whether anything
    /// was drawn.
    pub fn drain(&mut self, receiver: &EventReceiver<'_>) -> Result<bool, D::Error> {
        let mut handled = 0usize;
        while let Ok(event) = receiver.try_receive() {
            self.handle_event(event);
            handled += 1;
        }
        if handled > 0 {
            debug!("Drained {} events", handled);
        }
        self.render()
    }

    /// Run the display manager task
    ///
    /// Renders the initial face, then processes events from the channel
    /// forever.
    pub async fn run(&mut self, receiver: EventReceiver<'_>)
    where
        D::Error: core::fmt::Debug,
    {
        info!("Display manager task started");

        if let Err(e) = self.render() {
            error!("Display render error: {:?}", e);
        }

        loop {
            let event = receiver.receive().await;
            if let Err(e) = self.process_event(event) {
                error!("Error processing event: {:?}", e);
            }
        }
    }
}

/// Helper to get an event sender
pub fn event_sender() -> EventSender<'static> {
    EVENT_CHANNEL.sender()
}

/// Helper to get an event receiver
pub fn event_receiver() -> EventReceiver<'static> {
    EVENT_CHANNEL.receiver()
}
