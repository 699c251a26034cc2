//! The watchface: three bar groups under an optional status bar.
//!
//! [`Watchface`] owns the [`AppState`] and the fixed geometry. Host callbacks
//! (minute tick, battery, Bluetooth, configuration message) update the state
//! and mark the face dirty; [`Watchface::draw`] repaints everything from the
//! state and the current time.

use core::marker::PhantomData;

use chrono::NaiveDateTime;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use log::{debug, error, info};

use crate::app_state::{AppState, WatchError};
use crate::color::ColorDepth;
use crate::config::{ConfigMessage, DisplayConfig};
use crate::layer::RenderContext;
use crate::layout::{BarLayout, screen_bounds};
use crate::overlay::StatusOverlay;
use crate::storage::{SettingKey, SettingsStore, StoreError};
use crate::time::{BarCounts, HourPolicy};

pub struct Watchface<P: ColorDepth> {
    state: AppState,
    bars: BarLayout,
    overlay: StatusOverlay,
    bounds: Rectangle,
    dirty: bool,
    _depth: PhantomData<P>,
}

impl<P: ColorDepth> Watchface<P> {
    pub fn new(state: AppState) -> Self {
        info!(
            "Watchface created ({} panel, {} hours)",
            P::NAME,
            state.hour_policy.label()
        );
        Self {
            state,
            bars: BarLayout::new(),
            overlay: StatusOverlay::default(),
            bounds: screen_bounds(),
            dirty: true,
            _depth: PhantomData,
        }
    }

    /// Build a face from persisted settings.
    pub fn load<S: SettingsStore>(store: &S, hour_policy: HourPolicy) -> Self {
        let config = DisplayConfig::load(store);
        debug!("Loaded settings: {:?}", config);
        Self::new(AppState::new(config, hour_policy))
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn bars(&self) -> &BarLayout {
        &self.bars
    }

    /// Minute tick. The bar counts are recomputed at draw time.
    pub fn on_tick(&mut self) {
        self.dirty = true;
    }

    pub fn on_battery(&mut self, charge_percent: u8) {
        debug!("Battery at {}%", charge_percent);
        self.state.status.charge_percent = charge_percent.min(100);
        self.dirty = true;
    }

    pub fn on_bluetooth(&mut self, connected: bool) {
        debug!("Bluetooth connected: {}", connected);
        self.state.status.bluetooth_connected = connected;
        self.dirty = true;
    }

    pub fn set_locale(&mut self, locale: &str) {
        self.state.set_locale(locale);
        self.dirty = true;
    }

    #[cfg(test)]
    fn set_status_bar(&mut self, visible: bool) {
        self.state.config.status_bar = visible;
        self.dirty = true;
    }

    /// Persist and apply every field present in `message`.
    ///
    /// Each field is applied even when persisting it fails. The first write
    /// error is returned after all fields have been handled; nothing is
    /// rolled back.
    pub fn apply_config<S: SettingsStore>(
        &mut self,
        message: &ConfigMessage,
        store: &mut S,
    ) -> Result<(), WatchError> {
        if message.is_empty() {
            debug!("Configuration message carried no known fields");
        }

        let mut first_error = None;
        let mut record = |key: SettingKey, result: Result<(), StoreError>| {
            if let Err(err) = result {
                error!("Failed to persist {:?}: {}", key, err);
                first_error.get_or_insert(err);
            }
        };

        if let Some(color) = message.background_color {
            record(
                SettingKey::BackgroundColor,
                store.write_int(SettingKey::BackgroundColor, color),
            );
            self.state.config.background_color = color as u32;
        }
        if let Some(color) = message.foreground_color {
            record(
                SettingKey::ForegroundColor,
                store.write_int(SettingKey::ForegroundColor, color),
            );
            self.state.config.foreground_color = color as u32;
        }
        if let Some(visible) = message.status_bar {
            record(
                SettingKey::StatusBar,
                store.write_bool(SettingKey::StatusBar, visible),
            );
            self.state.config.status_bar = visible;
        }

        info!("Applied configuration: {:?}", self.state.config);
        self.dirty = true;

        match first_error {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Bar counts shown at `now`.
    pub fn counts_at(&self, now: &NaiveDateTime) -> BarCounts {
        BarCounts::from_time(now, self.state.hour_policy)
    }

    /// Repaint the whole face for `now`.
    pub fn draw<D>(&self, display: &mut D, now: NaiveDateTime) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = P::Color>,
    {
        let ctx = RenderContext::new(&self.state, now);
        let counts = self.counts_at(&now);
        debug!(
            "Drawing {} ({}h {}t {}m)",
            now, counts.hours, counts.tens, counts.minutes
        );

        self.bounds
            .into_styled(PrimitiveStyle::with_fill(ctx.background::<P>()))
            .draw(display)?;
        self.bars.draw(counts, ctx.foreground::<P>(), display)?;
        self.overlay.draw::<P, _>(&ctx, display)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{ColorDisplay, MonochromeDisplay};
    use crate::framebuffer::FrameBuffer;
    use crate::layout::{BAR_HEIGHT_PX, BAR_WIDTH_PX, GroupKind};
    use crate::storage::{MemoryStore, StoredValue};
    use chrono::NaiveDate;
    use embedded_graphics::pixelcolor::{BinaryColor, Rgb565};

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2015, 3, 7)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    /// Store whose writes always fail
    struct FullStore;

    impl SettingsStore for FullStore {
        fn read(&self, _key: SettingKey) -> Option<StoredValue> {
            None
        }

        fn write(&mut self, _key: SettingKey, _value: StoredValue) -> Result<(), StoreError> {
            Err(StoreError::Full)
        }
    }

    #[test]
    fn test_bars_light_up_for_time() {
        let face = Watchface::<MonochromeDisplay>::new(AppState::default());
        let mut fb = FrameBuffer::new(BinaryColor::Off);
        face.draw(&mut fb, at(13, 47)).unwrap();

        let bar_area = (BAR_WIDTH_PX * BAR_HEIGHT_PX) as usize;
        let hours = fb.count_in(&face.bars().group(GroupKind::Hours).bounds(), BinaryColor::On);
        let tens = fb.count_in(
            &face.bars().group(GroupKind::TenMinutes).bounds(),
            BinaryColor::On,
        );
        let minutes = fb.count_in(
            &face.bars().group(GroupKind::Minutes).bounds(),
            BinaryColor::On,
        );
        assert_eq!(hours, bar_area);
        assert_eq!(tens, 4 * bar_area);
        assert_eq!(minutes, 7 * bar_area);
        assert_eq!(fb.count(BinaryColor::On), 12 * bar_area);
    }

    #[test]
    fn test_midnight_policies() {
        let bar_area = (BAR_WIDTH_PX * BAR_HEIGHT_PX) as usize;

        let wrap = Watchface::<MonochromeDisplay>::new(AppState::default());
        let mut fb = FrameBuffer::new(BinaryColor::Off);
        wrap.draw(&mut fb, at(0, 0)).unwrap();
        assert_eq!(fb.count(BinaryColor::On), 12 * bar_area);

        let overflow = Watchface::<MonochromeDisplay>::new(AppState::new(
            DisplayConfig::default(),
            HourPolicy::NoonOverflow,
        ));
        let mut fb = FrameBuffer::new(BinaryColor::Off);
        overflow.draw(&mut fb, at(0, 0)).unwrap();
        assert_eq!(fb.count(BinaryColor::On), 0);
    }

    #[test]
    fn test_background_and_foreground_colors() {
        let mut state = AppState::default();
        state.config.background_color = 0x0000FF;
        state.config.foreground_color = 0xFFFF00;
        let face = Watchface::<ColorDisplay>::new(state);
        let mut fb = FrameBuffer::new(Rgb565::BLACK);
        face.draw(&mut fb, at(1, 0)).unwrap();

        let bar_area = (BAR_WIDTH_PX * BAR_HEIGHT_PX) as usize;
        assert_eq!(fb.count(Rgb565::new(31, 63, 0)), bar_area);
        assert_eq!(
            fb.count(Rgb565::new(0, 0, 31)),
            fb.as_slice().len() - bar_area
        );
    }

    #[test]
    fn test_status_bar_toggle_reproduces_pixels() {
        let mut face = Watchface::<ColorDisplay>::new(AppState::default());
        face.on_battery(15);
        face.on_bluetooth(true);
        face.set_locale("de_DE");
        face.set_status_bar(true);

        let mut before = FrameBuffer::new(Rgb565::BLACK);
        face.draw(&mut before, at(18, 5)).unwrap();

        face.set_status_bar(false);
        let mut hidden = FrameBuffer::new(Rgb565::BLACK);
        face.draw(&mut hidden, at(18, 5)).unwrap();
        assert_ne!(before.as_slice(), hidden.as_slice());

        face.set_status_bar(true);
        let mut after = FrameBuffer::new(Rgb565::BLACK);
        face.draw(&mut after, at(18, 5)).unwrap();
        assert_eq!(before.as_slice(), after.as_slice());
    }

    #[test]
    fn test_apply_config_persists_and_applies() {
        let mut store = MemoryStore::new();
        let mut face = Watchface::<ColorDisplay>::load(&store, HourPolicy::Wrap);
        face.mark_clean();

        let message = ConfigMessage {
            background_color: Some(0x112233),
            foreground_color: None,
            status_bar: Some(true),
        };
        face.apply_config(&message, &mut store).unwrap();

        assert!(face.is_dirty());
        assert_eq!(face.state().config.background_color, 0x112233);
        assert_eq!(face.state().config.foreground_color, 0xFFFFFF);
        assert!(face.state().config.status_bar);
        assert_eq!(store.read_int(SettingKey::BackgroundColor), Some(0x112233));
        assert_eq!(store.read(SettingKey::ForegroundColor), None);
        assert_eq!(store.read_bool(SettingKey::StatusBar), Some(true));

        let reloaded = Watchface::<ColorDisplay>::load(&store, HourPolicy::Wrap);
        assert_eq!(reloaded.state().config, face.state().config);
    }

    #[test]
    fn test_failed_write_still_applies_every_field() {
        let mut face = Watchface::<MonochromeDisplay>::new(AppState::default());
        let message = ConfigMessage {
            background_color: Some(0xFFFFFF),
            foreground_color: Some(0x000000),
            status_bar: Some(true),
        };

        let result = face.apply_config(&message, &mut FullStore);
        assert!(matches!(result, Err(WatchError::Store(StoreError::Full))));
        assert_eq!(face.state().config.background_color, 0xFFFFFF);
        assert_eq!(face.state().config.foreground_color, 0x000000);
        assert!(face.state().config.status_bar);
    }

    #[test]
    fn test_empty_message_still_redraws() {
        let mut store = MemoryStore::new();
        let mut face = Watchface::<MonochromeDisplay>::new(AppState::default());
        face.mark_clean();

        face.apply_config(&ConfigMessage::default(), &mut store).unwrap();
        assert!(face.is_dirty());
        assert!(store.is_empty());
        assert_eq!(face.state().config, DisplayConfig::default());
    }

    #[test]
    fn test_handlers_mark_dirty() {
        let mut face = Watchface::<MonochromeDisplay>::new(AppState::default());
        assert!(face.is_dirty());

        face.mark_clean();
        face.on_tick();
        assert!(face.is_dirty());

        face.mark_clean();
        face.on_battery(250);
        assert!(face.is_dirty());
        assert_eq!(face.state().status.charge_percent, 100);

        face.mark_clean();
        face.on_bluetooth(true);
        assert!(face.is_dirty());
    }
}
