//! Property tests for the station core

use calor_core::config::{MAX_SETPOINT, MIN_SETPOINT};
use calor_core::control::{ControlConfig, ControlLoop, PidGains};
use calor_core::settings::{record, RamStorage};
use calor_core::traits::{HeaterOutput, SensorError, TemperatureSensor};
use calor_core::{Device, Field, MemorySlot, MenuItem, Settings, View};
use calor_protocol::{ButtonEvent, Command, Gain, InputSnapshot, Reply};
use proptest::prelude::*;

struct FixedSensor(f32);

impl TemperatureSensor for FixedSensor {
    fn read_celsius(&mut self) -> Result<f32, SensorError> {
        Ok(self.0)
    }
}

struct NullHeater;

impl HeaterOutput for NullHeater {
    fn write(&mut self, _command: u8) {}
}

fn running(settings: &Settings) -> Device<RamStorage> {
    let storage = RamStorage::with_bytes(&record::encode(settings).unwrap());
    let mut device = Device::boot(storage, 0);
    device.poll(2001, InputSnapshot::IDLE, &mut FixedSensor(200.0), &mut NullHeater);
    device
}

fn slot() -> impl Strategy<Value = MemorySlot> {
    prop_oneof![
        Just(MemorySlot::One),
        Just(MemorySlot::Two),
        Just(MemorySlot::Three),
    ]
}

fn settings() -> impl Strategy<Value = Settings> {
    (
        (30u16..=300, 0.0f32..=250.0, 10u16..=120),
        (0.0f32..=30.0, 0.0f32..=30.0, 0.0f32..=30.0),
        prop::array::uniform3(MIN_SETPOINT..=MAX_SETPOINT),
        (0.5f32..=1.5, 50u8..=255, slot()),
    )
        .prop_map(
            |(
                (standby_timeout_s, standby_temperature, auto_off_timeout_min),
                (pid_p, pid_i, pid_d),
                memory,
                (temp_correction_factor, max_power_limit, last_selected_memory),
            )| Settings {
                standby_temperature,
                standby_timeout_s,
                pid_p,
                pid_i,
                pid_d,
                memory,
                temp_correction_factor,
                max_power_limit,
                auto_off_timeout_min,
                last_selected_memory,
                ..Settings::factory_defaults()
            },
        )
}

proptest! {
    #[test]
    fn setpoint_stays_in_range(deltas in prop::collection::vec(-40i16..=40, 1..60)) {
        let mut device = running(&Settings::factory_defaults());
        for (n, delta) in deltas.into_iter().enumerate() {
            device.poll(3000 + n as u32, InputSnapshot::rotate(delta), &mut FixedSensor(200.0), &mut NullHeater);
            let setpoint = device.control().setpoint();
            prop_assert!((MIN_SETPOINT..=MAX_SETPOINT).contains(&setpoint));
        }
    }

    #[test]
    fn record_survives_persist_and_load(settings in settings()) {
        let bytes = record::encode(&settings).unwrap();
        let decoded = record::decode(&bytes).unwrap();
        prop_assert_eq!(decoded, settings);
        prop_assert_eq!(record::encode(&decoded).unwrap(), bytes);
    }

    #[test]
    fn single_bit_flip_is_rejected(settings in settings(), bit in 0usize..(record::RECORD_LEN * 8)) {
        let mut bytes = record::encode(&settings).unwrap();
        bytes[bit / 8] ^= 1 << (bit % 8);
        prop_assert!(record::decode(&bytes).is_err());
    }

    #[test]
    fn standby_restores_setpoint(
        settings in settings(),
        timeout_s in 30u16..=300,
    ) {
        let settings = Settings { standby_timeout_s: timeout_s, ..settings };
        let mut device = running(&settings);
        let before = device.control().setpoint();
        let timeout_ms = timeout_s as u32 * 1000;
        let mut sensor = FixedSensor(200.0);

        device.poll(2001 + timeout_ms, InputSnapshot::IDLE, &mut sensor, &mut NullHeater);
        prop_assert!(!device.standby().is_standby());

        device.poll(2002 + timeout_ms, InputSnapshot::IDLE, &mut sensor, &mut NullHeater);
        prop_assert!(device.standby().is_standby());
        prop_assert_eq!(device.control().setpoint(), settings.standby_temperature);

        device.poll(2100 + timeout_ms, InputSnapshot::button(ButtonEvent::Clicked), &mut sensor, &mut NullHeater);
        prop_assert!(!device.standby().is_standby());
        prop_assert_eq!(device.control().setpoint(), before);
    }

    #[test]
    fn heater_command_never_exceeds_ceiling(
        gains in (0.0f32..=30.0, 0.0f32..=30.0, 0.0f32..=30.0),
        ceiling in 50u8..=255,
        readings in prop::collection::vec(0.0f32..=500.0, 1..50),
    ) {
        let gains = PidGains::new(gains.0, gains.1, gains.2);
        let mut control = ControlLoop::new(ControlConfig::default(), gains, ceiling, 350.0);
        for (n, measured) in readings.into_iter().enumerate() {
            let command = control.tick(n as u32 * 100, measured);
            prop_assert!(command <= ceiling);
            if measured >= 450.0 {
                prop_assert_eq!(command, 0);
            }
        }
    }

    #[test]
    fn menu_navigation_stays_in_bounds(
        steps in prop::collection::vec((-3i16..=3, any::<bool>()), 1..80),
    ) {
        let mut device = running(&Settings::factory_defaults());
        let mut sensor = FixedSensor(200.0);
        device.poll(2100, InputSnapshot::button(ButtonEvent::DoubleClicked), &mut sensor, &mut NullHeater);

        let mut now = 2200;
        for (delta, click) in steps {
            let item = device.menu().item();
            // Rotation is applied before the click, and clicking an action item restarts
            let click = click && delta == 0 && item.action().is_none();
            let input = InputSnapshot {
                delta,
                button: click.then_some(ButtonEvent::Clicked),
            };
            device.poll(now, input, &mut sensor, &mut NullHeater);
            now += 10;

            prop_assert!(device.menu().item().index() < MenuItem::ALL.len());
            for field in Field::ALL {
                let value = device.settings().get(field);
                let spec = field.spec();
                prop_assert!(value >= spec.min && value <= spec.max);
            }
        }
        prop_assert!(device.pending_restart().is_none());
    }

    #[test]
    fn three_clicks_cycle_back(start in slot()) {
        let settings = Settings { last_selected_memory: start, ..Settings::factory_defaults() };
        let mut device = running(&settings);
        let initial = device.control().setpoint();
        let mut sensor = FixedSensor(200.0);

        let mut seen = Vec::new();
        for n in 0..3 {
            device.poll(3000 + n * 100, InputSnapshot::button(ButtonEvent::Clicked), &mut sensor, &mut NullHeater);
            seen.push(device.memory().active());
        }

        prop_assert_eq!(seen, vec![start.next(), start.next().next(), start]);
        prop_assert_eq!(device.control().setpoint(), initial);
    }

    #[test]
    fn interaction_timeout_returns_to_main(idle_ms in 20_001u32..40_000) {
        let mut device = running(&Settings::factory_defaults());
        let mut sensor = FixedSensor(200.0);
        device.poll(3000, InputSnapshot::button(ButtonEvent::DoubleClicked), &mut sensor, &mut NullHeater);
        prop_assert!(matches!(device.view(), View::Settings(_)));

        device.poll(3000 + idle_ms, InputSnapshot::IDLE, &mut sensor, &mut NullHeater);
        prop_assert!(matches!(device.view(), View::Main(_)));
        prop_assert_eq!(device.menu().item(), MenuItem::Exit);
        prop_assert!(!device.menu().editing());
    }

    #[test]
    fn saved_serial_gains_load_back(
        gain in prop_oneof![Just(Gain::P), Just(Gain::I), Just(Gain::D)],
        value in -1000.0f32..1000.0,
        settings in settings(),
    ) {
        let mut device = running(&settings);
        device.handle_command(Command::SetGain(gain, value), 3000);
        prop_assert_eq!(device.handle_command(Command::SaveTunings, 3000), Reply::SettingsSaved);

        let bytes = device.storage().bytes().unwrap();
        let rebooted = Device::boot(RamStorage::with_bytes(bytes), 0);
        prop_assert!(rebooted.pending_restart().is_none());
        prop_assert_eq!(rebooted.storage().bytes().unwrap(), bytes);
        prop_assert_eq!(rebooted.settings().memory, device.settings().memory);
    }
}
