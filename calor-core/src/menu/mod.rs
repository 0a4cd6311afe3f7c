//! Menu automaton
//!
//! Interprets encoder input while the station is active. The main view
//! adjusts the setpoint and drives the memory presets; a double-click
//! opens the settings menu, where rotation either moves between items or
//! edits the selected field.
//!
//! Side effects that need persistence or a restart are returned as an
//! [`Outcome`] for the caller to carry out.

mod item;

pub use item::{MenuAction, MenuItem};

use calor_protocol::{ButtonEvent, InputSnapshot};

use crate::config::{INTERACTION_TIMEOUT_MS, LOGO_DURATION_MS, SETPOINT_STEP};
use crate::control::ControlLoop;
use crate::memory::{MemorySlot, MemorySlots};
use crate::settings::{Field, Settings};

/// Top-level UI mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Boot logo, input ignored
    Logo,
    /// Setpoint and temperature view
    Main,
    /// Settings menu
    Settings,
}

/// Menu results the caller has to act on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outcome {
    /// A settings field changed in RAM
    Edited(Field),
    /// The setpoint was stored into a preset; settings must be persisted
    Stored(MemorySlot),
    /// An action item was clicked
    Action(MenuAction),
}

/// Menu automaton state
#[derive(Debug, Clone)]
pub struct Menu {
    mode: Mode,
    item: MenuItem,
    editing: bool,
    fast_increment: bool,
    boot_ms: u32,
    last_interaction_ms: u32,
}

impl Menu {
    /// Start on the boot logo
    pub fn new(now_ms: u32) -> Self {
        Self {
            mode: Mode::Logo,
            item: MenuItem::Exit,
            editing: false,
            fast_increment: false,
            boot_ms: now_ms,
            last_interaction_ms: now_ms,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Selected settings item
    pub fn item(&self) -> MenuItem {
        self.item
    }

    /// True while rotation edits the selected field
    pub fn editing(&self) -> bool {
        self.editing
    }

    /// True while the button is held during editing
    pub fn fast_increment(&self) -> bool {
        self.fast_increment
    }

    /// Leave the logo once it has been shown long enough
    pub fn finish_logo(&mut self, now_ms: u32) -> bool {
        if self.mode != Mode::Logo || now_ms.wrapping_sub(self.boot_ms) <= LOGO_DURATION_MS {
            return false;
        }
        self.mode = Mode::Main;
        self.last_interaction_ms = now_ms;
        true
    }

    /// Restart the interaction timer
    pub fn note_interaction(&mut self, now_ms: u32) {
        self.last_interaction_ms = now_ms;
    }

    /// Fall back to the main view after a quiet period
    ///
    /// Clears store mode and editing. Returns true if anything was reset.
    pub fn check_timeout(&mut self, now_ms: u32, memory: &mut MemorySlots) -> bool {
        if self.mode == Mode::Logo
            || now_ms.wrapping_sub(self.last_interaction_ms) <= INTERACTION_TIMEOUT_MS
        {
            return false;
        }

        let changed = self.mode != Mode::Main || memory.store_mode() || self.editing;
        self.mode = Mode::Main;
        self.item = MenuItem::Exit;
        self.editing = false;
        self.fast_increment = false;
        memory.cancel_store_mode();
        self.last_interaction_ms = now_ms;
        changed
    }

    /// Main view input
    pub fn handle_main(
        &mut self,
        input: InputSnapshot,
        control: &mut ControlLoop,
        memory: &mut MemorySlots,
        settings: &mut Settings,
    ) -> Option<Outcome> {
        if input.is_rotation() {
            if memory.store_mode() {
                memory.select_pending(input.direction());
            } else {
                control.set_setpoint(control.setpoint() + SETPOINT_STEP * input.delta as f32);
            }
        }

        match input.button? {
            ButtonEvent::Clicked => {
                if memory.store_mode() {
                    let slot = memory.commit(control.setpoint(), settings)?;
                    return Some(Outcome::Stored(slot));
                }
                let temperature = memory.cycle(settings);
                control.set_setpoint(temperature);
            }
            ButtonEvent::Held => {
                memory.enter_store_mode();
            }
            ButtonEvent::DoubleClicked => {
                memory.cancel_store_mode();
                self.mode = Mode::Settings;
                self.item = MenuItem::Exit;
                self.editing = false;
                self.fast_increment = false;
            }
            ButtonEvent::Released => {}
        }
        None
    }

    /// Settings menu input
    pub fn handle_settings(
        &mut self,
        input: InputSnapshot,
        settings: &mut Settings,
    ) -> Option<Outcome> {
        self.fast_increment = input.is(ButtonEvent::Held);

        let mut outcome = None;
        if input.is_rotation() {
            match self.item.field() {
                Some(field) if self.editing => {
                    settings.adjust(field, input.direction(), self.fast_increment);
                    outcome = Some(Outcome::Edited(field));
                }
                _ => self.item = self.item.step(input.direction()),
            }
        }

        if input.is(ButtonEvent::Clicked) {
            if let Some(action) = self.item.action() {
                return Some(Outcome::Action(action));
            }
            self.editing = !self.editing;
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::{ControlConfig, PidGains};

    struct Fixture {
        menu: Menu,
        control: ControlLoop,
        memory: MemorySlots,
        settings: Settings,
    }

    impl Fixture {
        fn new() -> Self {
            let settings = Settings::factory_defaults();
            let mut menu = Menu::new(0);
            menu.finish_logo(2001);
            Self {
                menu,
                control: ControlLoop::new(ControlConfig::default(), settings.gains(), 220, 300.0),
                memory: MemorySlots::new(MemorySlot::One),
                settings,
            }
        }

        fn main(&mut self, input: InputSnapshot) -> Option<Outcome> {
            self.menu
                .handle_main(input, &mut self.control, &mut self.memory, &mut self.settings)
        }

        fn settings(&mut self, input: InputSnapshot) -> Option<Outcome> {
            self.menu.handle_settings(input, &mut self.settings)
        }
    }

    #[test]
    fn test_logo_duration() {
        let mut menu = Menu::new(0);
        assert!(!menu.finish_logo(2000));
        assert_eq!(menu.mode(), Mode::Logo);
        assert!(menu.finish_logo(2001));
        assert_eq!(menu.mode(), Mode::Main);
    }

    #[test]
    fn test_rotation_then_double_click() {
        let mut f = Fixture::new();
        f.main(InputSnapshot::rotate(3));
        assert_eq!(f.control.setpoint(), 315.0);

        f.main(InputSnapshot::button(ButtonEvent::DoubleClicked));
        assert_eq!(f.menu.mode(), Mode::Settings);
        assert_eq!(f.menu.item(), MenuItem::Exit);
        assert!(!f.menu.editing());
    }

    #[test]
    fn test_setpoint_clamped() {
        let mut f = Fixture::new();
        f.main(InputSnapshot::rotate(100));
        assert_eq!(f.control.setpoint(), 400.0);
        f.main(InputSnapshot::rotate(-200));
        assert_eq!(f.control.setpoint(), 100.0);
    }

    #[test]
    fn test_click_cycles_presets() {
        let mut f = Fixture::new();
        f.main(InputSnapshot::button(ButtonEvent::Clicked));
        assert_eq!(f.control.setpoint(), 260.0);
        assert_eq!(f.memory.active(), MemorySlot::Two);
    }

    #[test]
    fn test_store_mode_flow() {
        let mut f = Fixture::new();
        f.main(InputSnapshot::rotate(-2));
        assert_eq!(f.control.setpoint(), 290.0);

        f.main(InputSnapshot::button(ButtonEvent::Held));
        assert_eq!(f.memory.pending(), Some(MemorySlot::One));

        // Rotation moves the target, not the setpoint
        f.main(InputSnapshot::rotate(4));
        assert_eq!(f.memory.pending(), Some(MemorySlot::Two));
        assert_eq!(f.control.setpoint(), 290.0);

        let outcome = f.main(InputSnapshot::button(ButtonEvent::Clicked));
        assert_eq!(outcome, Some(Outcome::Stored(MemorySlot::Two)));
        assert_eq!(f.settings.memory(MemorySlot::Two), 290.0);
        assert_eq!(f.memory.active(), MemorySlot::Two);
        assert!(!f.memory.store_mode());
    }

    #[test]
    fn test_settings_navigation_and_edit() {
        let mut f = Fixture::new();
        f.main(InputSnapshot::button(ButtonEvent::DoubleClicked));

        f.settings(InputSnapshot::rotate(1));
        assert_eq!(f.menu.item(), MenuItem::StandbyTime);

        f.settings(InputSnapshot::button(ButtonEvent::Clicked));
        assert!(f.menu.editing());

        let outcome = f.settings(InputSnapshot::rotate(1));
        assert_eq!(outcome, Some(Outcome::Edited(Field::StandbyTimeout)));
        assert_eq!(f.settings.standby_timeout_s, 65);
        assert_eq!(f.menu.item(), MenuItem::StandbyTime);

        f.settings(InputSnapshot::button(ButtonEvent::Clicked));
        assert!(!f.menu.editing());
        f.settings(InputSnapshot::rotate(1));
        assert_eq!(f.menu.item(), MenuItem::StandbyTemperature);
    }

    #[test]
    fn test_held_rotation_uses_fast_step() {
        let mut f = Fixture::new();
        f.main(InputSnapshot::button(ButtonEvent::DoubleClicked));
        for _ in 0..4 {
            f.settings(InputSnapshot::rotate(1));
        }
        assert_eq!(f.menu.item(), MenuItem::PidP);
        f.settings(InputSnapshot::button(ButtonEvent::Clicked));

        f.settings(InputSnapshot {
            delta: 1,
            button: Some(ButtonEvent::Held),
        });
        assert!(f.menu.fast_increment());
        assert_eq!(f.settings.pid_p, 5.0);

        f.settings(InputSnapshot::button(ButtonEvent::Released));
        assert!(!f.menu.fast_increment());
    }

    #[test]
    fn test_action_items() {
        let mut f = Fixture::new();
        f.main(InputSnapshot::button(ButtonEvent::DoubleClicked));
        assert_eq!(
            f.settings(InputSnapshot::button(ButtonEvent::Clicked)),
            Some(Outcome::Action(MenuAction::Restart))
        );

        // One item per poll regardless of the detent count
        for _ in 0..9 {
            f.settings(InputSnapshot::rotate(3));
        }
        assert_eq!(f.menu.item(), MenuItem::SaveAll);
        assert_eq!(
            f.settings(InputSnapshot::button(ButtonEvent::Clicked)),
            Some(Outcome::Action(MenuAction::SaveAndRestart))
        );
        assert!(!f.menu.editing());

        f.settings(InputSnapshot::rotate(1));
        assert_eq!(
            f.settings(InputSnapshot::button(ButtonEvent::Clicked)),
            Some(Outcome::Action(MenuAction::FactoryReset))
        );
    }

    #[test]
    fn test_interaction_timeout() {
        let mut f = Fixture::new();
        f.menu.note_interaction(5000);
        f.main(InputSnapshot::button(ButtonEvent::Held));
        assert!(f.memory.store_mode());

        assert!(!f.menu.check_timeout(25_000, &mut f.memory));
        assert!(f.menu.check_timeout(25_001, &mut f.memory));
        assert!(!f.memory.store_mode());
        assert_eq!(f.menu.mode(), Mode::Main);
    }

    #[test]
    fn test_timeout_leaves_settings() {
        let mut f = Fixture::new();
        f.menu.note_interaction(0);
        f.main(InputSnapshot::button(ButtonEvent::DoubleClicked));
        f.settings(InputSnapshot::rotate(2));
        f.settings(InputSnapshot::button(ButtonEvent::Clicked));

        assert!(f.menu.check_timeout(20_001, &mut f.memory));
        assert_eq!(f.menu.mode(), Mode::Main);
        assert_eq!(f.menu.item(), MenuItem::Exit);
        assert!(!f.menu.editing());
    }
}
