//! Heater and temperature sensor traits

/// Errors that can occur with temperature sensing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// Sensor disconnected (open circuit)
    OpenCircuit,
    /// Sensor shorted to ground
    ShortCircuit,
    /// Reading out of expected range
    OutOfRange,
    /// ADC conversion error
    ConversionError,
}

/// Trait for temperature sensors
///
/// Implementations handle the specific sensor type and return the raw,
/// uncorrected temperature. The correction factor from the settings is
/// applied by the caller.
pub trait TemperatureSensor {
    /// Read the current temperature in degrees Celsius
    ///
    /// Takes `&mut self` because ADC reads typically require mutable access.
    fn read_celsius(&mut self) -> Result<f32, SensorError>;
}

/// Trait for heater output control
///
/// The command is a duty level from 0 (off) to 255 (full power).
pub trait HeaterOutput {
    /// Apply a heater command
    fn write(&mut self, command: u8);

    /// Force the heater off
    fn off(&mut self) {
        self.write(0);
    }
}
