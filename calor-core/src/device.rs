//! The station aggregate
//!
//! [`Device`] owns every piece of mutable state (settings, control loop,
//! standby and menu automata, presets, timers) and advances all of them
//! in [`Device::poll`], once per main-loop iteration. Collaborators that
//! touch hardware are passed in per call.

use calor_protocol::{ButtonEvent, Command, InputSnapshot, Reply, Telemetry};

use crate::config::TELEMETRY_INTERVAL_MS;
use crate::control::{ControlConfig, ControlLoop};
use crate::memory::MemorySlots;
use crate::menu::{Menu, MenuAction, Mode, Outcome};
use crate::restart::{PendingRestart, RestartReason};
use crate::settings::{Field, Loaded, PersistError, Settings, SettingsStore};
use crate::standby::Standby;
use crate::traits::{HeaterOutput, SensorError, SettingsStorage, TemperatureSensor};
use crate::view::{Blink, MainView, SettingsView, View};

/// Result of one loop iteration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    /// Heater command written this iteration
    pub command: u8,
    /// Telemetry record, when one is due
    pub telemetry: Option<Telemetry>,
}

/// The soldering station
pub struct Device<S> {
    store: SettingsStore<S>,
    settings: Settings,
    control: ControlLoop,
    standby: Standby,
    menu: Menu,
    memory: MemorySlots,
    blink: Blink,
    measured: f32,
    sensor_fault: Option<SensorError>,
    last_telemetry_ms: u32,
    restart: Option<PendingRestart>,
}

impl<S: SettingsStorage> Device<S> {
    /// Load settings and start on the boot logo
    ///
    /// The initial setpoint is the last selected preset. If the stored
    /// record was rejected, defaults are persisted and a restart is
    /// scheduled.
    pub fn boot(storage: S, now_ms: u32) -> Self {
        let mut store = SettingsStore::new(storage);
        let loaded = store.load();
        let settings = loaded.settings();

        let slot = settings.last_selected_memory;
        let control = ControlLoop::new(
            ControlConfig::default(),
            settings.gains(),
            settings.max_power_limit,
            settings.memory(slot),
        );

        let restart = match loaded {
            Loaded::FactoryDefaults { .. } => {
                Some(PendingRestart::new(RestartReason::FactoryReset, now_ms))
            }
            Loaded::Stored(_) => None,
        };

        Self {
            store,
            settings,
            control,
            standby: Standby::new(now_ms),
            menu: Menu::new(now_ms),
            memory: MemorySlots::new(slot),
            blink: Blink::new(now_ms),
            measured: 0.0,
            sensor_fault: None,
            last_telemetry_ms: now_ms,
            restart,
        }
    }

    /// Run one main-loop iteration
    ///
    /// Input is applied first, then timers, then the control loop. The
    /// heater command is written on every call. Input is ignored while a
    /// restart is pending.
    pub fn poll<T, H>(
        &mut self,
        now_ms: u32,
        input: InputSnapshot,
        sensor: &mut T,
        heater: &mut H,
    ) -> Tick
    where
        T: TemperatureSensor,
        H: HeaterOutput,
    {
        if self.restart.is_none() {
            self.handle_input(now_ms, input);
        }

        if self.menu.finish_logo(now_ms) {
            self.standby.note_activity(now_ms);
        }
        self.standby.check_timeout(
            now_ms,
            self.settings.standby_timeout_s,
            self.settings.standby_temperature,
            &mut self.control,
        );

        let command = match sensor.read_celsius() {
            Ok(raw) => {
                self.sensor_fault = None;
                self.measured = raw * self.settings.temp_correction_factor;
                if self.standby.sample(now_ms, self.measured, &mut self.control) {
                    self.menu.note_interaction(now_ms);
                }
                self.control.tick(now_ms, self.measured)
            }
            Err(e) => {
                if self.sensor_fault.is_none() {
                    #[cfg(feature = "defmt")]
                    defmt::error!("Temperature sensor fault: {}", e);
                }
                self.sensor_fault = Some(e);
                self.control.fault()
            }
        };
        heater.write(command);

        self.blink.update(now_ms);
        self.menu.check_timeout(now_ms, &mut self.memory);
        if !self.standby.is_standby() && !self.memory.store_mode() {
            self.memory.track(self.control.setpoint(), &mut self.settings);
        }

        let telemetry = if now_ms.wrapping_sub(self.last_telemetry_ms) > TELEMETRY_INTERVAL_MS {
            self.last_telemetry_ms = now_ms;
            Some(self.telemetry())
        } else {
            None
        };

        Tick { command, telemetry }
    }

    /// Execute a serial command
    pub fn handle_command(&mut self, command: Command, now_ms: u32) -> Reply {
        match command {
            Command::SetGain(gain, value) => {
                // Stored gains must stay within the menu bounds
                let value = Field::from(gain).spec().clamp(value);
                let gains = self.control.gains().with(gain, value);
                if !self.control.set_tunings(gains) {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("Rejected gain {} = {}", gain, value);
                }
                Reply::GainChanged(gain, self.control.gains().get(gain))
            }
            Command::PrintTunings => {
                let gains = self.control.gains();
                Reply::Tunings {
                    p: gains.p,
                    i: gains.i,
                    d: gains.d,
                }
            }
            Command::SetSetpoint(setpoint) => {
                self.control.set_setpoint(setpoint);
                Reply::Setpoint(self.control.setpoint())
            }
            Command::SaveTunings => {
                self.settings.set_gains(self.control.gains());
                match self.persist() {
                    Ok(()) => Reply::SettingsSaved,
                    Err(_) => Reply::SaveFailed,
                }
            }
            Command::FactoryReset => {
                self.factory_reset(now_ms);
                Reply::FactoryReset
            }
        }
    }

    /// Describe the screen contents
    pub fn view(&self) -> View {
        match self.menu.mode() {
            Mode::Logo => View::Logo,
            Mode::Main => {
                let setpoint = self.control.setpoint();
                View::Main(MainView {
                    setpoint,
                    measured: self.measured,
                    actuator_percent: self.control.actuator_percent(),
                    active_slot: self.memory.matching(setpoint, &self.settings),
                    pending_slot: self.memory.pending(),
                    blink_on: self.blink.visible(),
                    standby: self.standby.is_standby(),
                    sensor_fault: self.sensor_fault.is_some(),
                })
            }
            Mode::Settings => View::Settings(SettingsView::new(
                self.menu.item(),
                self.menu.editing(),
                &self.settings,
                self.blink.visible(),
            )),
        }
    }

    /// Current telemetry record
    ///
    /// Gains are the stored settings, not the running controller's.
    pub fn telemetry(&self) -> Telemetry {
        let gains = self.settings.gains();
        Telemetry {
            setpoint: self.control.setpoint(),
            measured: self.measured,
            actuator_percent: self.control.actuator_percent(),
            p: gains.p,
            i: gains.i,
            d: gains.d,
            standby: self.standby.is_standby(),
            standby_temperature: self.settings.standby_temperature,
            standby_timeout_s: self.settings.standby_timeout_s,
        }
    }

    /// Restart reason, once the scheduled restart is due
    pub fn restart_due(&self, now_ms: u32) -> Option<RestartReason> {
        self.restart
            .filter(|restart| restart.is_due(now_ms))
            .map(|restart| restart.reason)
    }

    pub fn pending_restart(&self) -> Option<PendingRestart> {
        self.restart
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn control(&self) -> &ControlLoop {
        &self.control
    }

    pub fn standby(&self) -> &Standby {
        &self.standby
    }

    pub fn menu(&self) -> &Menu {
        &self.menu
    }

    pub fn memory(&self) -> &MemorySlots {
        &self.memory
    }

    /// Corrected temperature from the last good reading
    pub fn measured(&self) -> f32 {
        self.measured
    }

    pub fn storage(&self) -> &S {
        self.store.storage()
    }

    fn handle_input(&mut self, now_ms: u32, input: InputSnapshot) {
        if self.menu.mode() == Mode::Logo || !input.has_activity() {
            return;
        }

        if self.standby.is_standby() {
            if input.is(ButtonEvent::Clicked) {
                self.standby.click(now_ms, &mut self.control);
                self.menu.note_interaction(now_ms);
            } else {
                self.standby.absorb(input.delta);
            }
            return;
        }

        self.standby.note_activity(now_ms);
        self.menu.note_interaction(now_ms);

        let outcome = match self.menu.mode() {
            Mode::Main => self.menu.handle_main(
                input,
                &mut self.control,
                &mut self.memory,
                &mut self.settings,
            ),
            Mode::Settings => {
                if input.is_rotation() {
                    self.blink.force_visible(now_ms);
                }
                self.menu.handle_settings(input, &mut self.settings)
            }
            Mode::Logo => None,
        };

        if let Some(outcome) = outcome {
            self.apply(outcome, now_ms);
        }
    }

    fn apply(&mut self, outcome: Outcome, now_ms: u32) {
        match outcome {
            Outcome::Edited(field) => {
                if field.affects_control() {
                    self.sync_control();
                }
            }
            Outcome::Stored(_slot) => {
                #[cfg(feature = "defmt")]
                defmt::info!("Stored {} C in preset {}", self.control.setpoint(), _slot.number());
                let _ = self.persist();
            }
            Outcome::Action(MenuAction::Restart) => {
                self.schedule_restart(RestartReason::MenuExit, now_ms);
            }
            Outcome::Action(MenuAction::SaveAndRestart) => {
                let _ = self.persist();
                self.schedule_restart(RestartReason::SettingsSaved, now_ms);
            }
            Outcome::Action(MenuAction::FactoryReset) => self.factory_reset(now_ms),
        }
    }

    fn persist(&mut self) -> Result<(), PersistError> {
        let result = self.store.persist(&self.settings);
        if let Err(_e) = result {
            #[cfg(feature = "defmt")]
            defmt::error!("Failed to persist settings: {}", _e);
        }
        result
    }

    fn factory_reset(&mut self, now_ms: u32) {
        self.settings = self.store.reset_factory_defaults();
        self.sync_control();
        self.schedule_restart(RestartReason::FactoryReset, now_ms);
    }

    fn sync_control(&mut self) {
        self.control.set_tunings(self.settings.gains());
        self.control.set_ceiling(self.settings.max_power_limit);
    }

    fn schedule_restart(&mut self, reason: RestartReason, now_ms: u32) {
        if self.restart.is_none() {
            #[cfg(feature = "defmt")]
            defmt::info!("Restart scheduled: {}", reason);
            self.restart = Some(PendingRestart::new(reason, now_ms));
        }
    }
}
