//! View descriptors
//!
//! The core decides *what* is on screen; a [`ViewRenderer`] implementation
//! in the firmware decides how it looks. Views are plain data rebuilt
//! every loop iteration.

use core::fmt::Write;

use heapless::String;

use crate::config::BLINK_INTERVAL_MS;
use crate::memory::MemorySlot;
use crate::menu::MenuItem;
use crate::settings::Settings;

/// Formatted settings value, e.g. `"150"` or `"0.85"`
pub type ValueText = String<8>;

/// Main view contents
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MainView {
    /// Target temperature
    pub setpoint: f32,
    /// Corrected tip temperature
    pub measured: f32,
    /// Heater command as a percentage of the power ceiling
    pub actuator_percent: f32,
    /// Preset whose temperature equals the setpoint
    pub active_slot: Option<MemorySlot>,
    /// Store target while in store mode
    pub pending_slot: Option<MemorySlot>,
    /// Blink phase for the store target indicator
    pub blink_on: bool,
    /// Regulating to the standby temperature
    pub standby: bool,
    /// Sensor reading failed this iteration
    pub sensor_fault: bool,
}

/// Settings menu contents
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SettingsView {
    pub item: MenuItem,
    pub title: &'static str,
    pub editing: bool,
    /// Empty for action items
    pub value: ValueText,
    pub unit: &'static str,
    /// Blink phase for the value being edited
    pub blink_on: bool,
}

impl SettingsView {
    /// Build the view for the selected item
    pub fn new(item: MenuItem, editing: bool, settings: &Settings, blink_on: bool) -> Self {
        Self {
            item,
            title: item.title(),
            editing,
            value: format_value(item, settings),
            unit: item.unit(),
            blink_on,
        }
    }

    /// The value is drawn unless it is being edited and blinked out
    pub fn value_visible(&self) -> bool {
        !self.editing || self.blink_on
    }
}

/// What to show this iteration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum View {
    Logo,
    Main(MainView),
    Settings(SettingsView),
}

impl View {
    /// Dispatch to the matching renderer method
    pub fn render<R: ViewRenderer>(&self, renderer: &mut R) -> Result<(), R::Error> {
        match self {
            View::Logo => renderer.draw_logo(),
            View::Main(view) => renderer.draw_main(view),
            View::Settings(view) => renderer.draw_settings(view),
        }
    }
}

/// Draws views on a physical display
pub trait ViewRenderer {
    type Error;

    fn draw_logo(&mut self) -> Result<(), Self::Error>;

    fn draw_main(&mut self, view: &MainView) -> Result<(), Self::Error>;

    fn draw_settings(&mut self, view: &SettingsView) -> Result<(), Self::Error>;
}

/// Format the value of a settings item for display
pub fn format_value(item: MenuItem, settings: &Settings) -> ValueText {
    let mut text = ValueText::new();

    // Values are at most four characters wide
    let _ = match item {
        MenuItem::StandbyTime => write!(text, "{}", settings.standby_timeout_s),
        MenuItem::StandbyTemperature => write!(text, "{:.0}", settings.standby_temperature),
        MenuItem::PowerOff => write!(text, "{}", settings.auto_off_timeout_min),
        MenuItem::PidP => write!(text, "{:.2}", settings.pid_p),
        MenuItem::PidI => write!(text, "{:.2}", settings.pid_i),
        MenuItem::PidD => write!(text, "{:.2}", settings.pid_d),
        MenuItem::TempCorrection => write!(text, "{:.2}", settings.temp_correction_factor),
        MenuItem::MaxPower => write!(text, "{}", power_percent(settings.max_power_limit)),
        MenuItem::Exit | MenuItem::SaveAll | MenuItem::ResetAll => Ok(()),
    };

    text
}

/// Power ceiling as shown to the user (0..=254 mapped onto 0..=100)
pub fn power_percent(max_power_limit: u8) -> u16 {
    max_power_limit as u16 * 100 / 254
}

/// Blink phase generator
#[derive(Debug, Clone, Copy)]
pub struct Blink {
    visible: bool,
    last_toggle_ms: u32,
}

impl Blink {
    pub fn new(now_ms: u32) -> Self {
        Self {
            visible: true,
            last_toggle_ms: now_ms,
        }
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Toggle once more than one interval has passed
    pub fn update(&mut self, now_ms: u32) {
        if now_ms.wrapping_sub(self.last_toggle_ms) > BLINK_INTERVAL_MS {
            self.visible = !self.visible;
            self.last_toggle_ms = now_ms;
        }
    }

    /// Show immediately and restart the interval
    pub fn force_visible(&mut self, now_ms: u32) {
        self.visible = true;
        self.last_toggle_ms = now_ms;
    }
}
