//! NTC 100K thermistor sensor
//!
//! The tip thermistor sits at the bottom of a divider with a pull-up to
//! the ADC reference. Readings are oversampled and converted through a
//! lookup table with linear interpolation, so no logarithms are needed.

use calor_core::traits::{SensorError, TemperatureSensor};

/// NTC 100K thermistor temperature lookup table
///
/// Table format: (resistance_ohms, temperature_c)
/// Generated using beta equation with:
/// - R0 = 100,000 ohms at T0 = 25°C
/// - Beta = 3950K
///
/// Temperature range: 0°C to 500°C
const TEMP_TABLE: &[(f32, f32)] = &[
    (336_206.0, 0.0),
    (100_000.0, 25.0), // R0
    (35_882.0, 50.0),
    (14_917.0, 75.0),
    (6_975.0, 100.0),
    (3_588.0, 125.0),
    (1_997.0, 150.0),
    (1_186.0, 175.0),
    (745.0, 200.0),
    (490.0, 225.0),
    (335.0, 250.0),
    (238.0, 275.0),
    (174.0, 300.0),
    (130.0, 325.0),
    (100.0, 350.0),
    (78.0, 375.0),
    (62.0, 400.0),
    (51.0, 425.0),
    (42.0, 450.0), // heater cut-off
    (34.6, 475.0),
    (29.2, 500.0),
];

/// ADC reading trait for platform abstraction
pub trait AdcReader {
    /// Read ADC value (12-bit, 0-4095)
    #[allow(clippy::result_unit_err)]
    fn read(&mut self) -> Result<u16, ()>;
}

/// Divider and sampling parameters
#[derive(Debug, Clone, Copy)]
pub struct NtcConfig {
    /// Pull-up resistor value in ohms
    pub pullup_ohms: f32,
    /// ADC full scale (4096 for 12-bit)
    pub adc_max: u16,
    /// Conversions averaged per reading
    pub samples: u8,
}

impl Default for NtcConfig {
    fn default() -> Self {
        Self {
            pullup_ohms: 4700.0,
            adc_max: 4096,
            samples: 10,
        }
    }
}

/// NTC 100K thermistor with B=3950
pub struct Ntc100kSensor<ADC> {
    adc: ADC,
    config: NtcConfig,
}

impl<ADC> Ntc100kSensor<ADC> {
    pub fn new(adc: ADC, config: NtcConfig) -> Self {
        Self { adc, config }
    }

    /// Convert ADC reading to resistance
    ///
    /// Circuit: VCC -- pullup -- ADC_PIN -- NTC -- GND
    /// R_ntc = R_pullup * adc_value / (adc_max - adc_value)
    pub fn adc_to_resistance(&self, adc_value: u16) -> Result<f32, SensorError> {
        // Open circuit pulls the pin to the rail
        if adc_value >= self.config.adc_max.saturating_sub(10) {
            return Err(SensorError::OpenCircuit);
        }

        if adc_value < 10 {
            return Err(SensorError::ShortCircuit);
        }

        let denominator = (self.config.adc_max - adc_value) as f32;
        Ok(self.config.pullup_ohms * adc_value as f32 / denominator)
    }

    /// Calculate temperature from resistance using the lookup table
    pub fn resistance_to_celsius(resistance: f32) -> Result<f32, SensorError> {
        let (r_first, _) = TEMP_TABLE[0];
        let (r_last, _) = TEMP_TABLE[TEMP_TABLE.len() - 1];
        if !(r_last..=r_first).contains(&resistance) {
            return Err(SensorError::OutOfRange);
        }

        // Table is sorted by decreasing resistance (increasing temperature)
        TEMP_TABLE
            .windows(2)
            .find(|pair| resistance <= pair[0].0 && resistance >= pair[1].0)
            .map(|pair| {
                let (r_high, t_low) = pair[0];
                let (r_low, t_high) = pair[1];
                t_low + (t_high - t_low) * (r_high - resistance) / (r_high - r_low)
            })
            .ok_or(SensorError::OutOfRange)
    }
}

impl<ADC: AdcReader> Ntc100kSensor<ADC> {
    /// Averaged raw ADC value
    pub fn read_average(&mut self) -> Result<u16, SensorError> {
        let samples = self.config.samples.max(1) as u32;
        let mut sum = 0u32;
        for _ in 0..samples {
            sum += self.adc.read().map_err(|_| SensorError::ConversionError)? as u32;
        }
        Ok((sum / samples) as u16)
    }
}

impl<ADC: AdcReader> TemperatureSensor for Ntc100kSensor<ADC> {
    fn read_celsius(&mut self) -> Result<f32, SensorError> {
        let adc_value = self.read_average()?;
        let resistance = self.adc_to_resistance(adc_value)?;
        Self::resistance_to_celsius(resistance)
    }
}

/// Dummy ADC for testing (returns a fixed value)
#[cfg(test)]
pub struct DummyAdc(pub u16);

#[cfg(test)]
impl AdcReader for DummyAdc {
    fn read(&mut self) -> Result<u16, ()> {
        Ok(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sensor(adc: u16) -> Ntc100kSensor<DummyAdc> {
        Ntc100kSensor::new(DummyAdc(adc), NtcConfig::default())
    }

    fn close(a: f32, b: f32, tolerance: f32) -> bool {
        a - b < tolerance && b - a < tolerance
    }

    #[test]
    fn test_resistance_to_temp() {
        let temp = Ntc100kSensor::<DummyAdc>::resistance_to_celsius(100_000.0).unwrap();
        assert_eq!(temp, 25.0);

        let temp = Ntc100kSensor::<DummyAdc>::resistance_to_celsius(174.0).unwrap();
        assert_eq!(temp, 300.0);

        // Halfway between table points
        let temp = Ntc100kSensor::<DummyAdc>::resistance_to_celsius(115.0).unwrap();
        assert!(close(temp, 337.5, 0.01));
    }

    #[test]
    fn test_out_of_table() {
        assert_eq!(
            Ntc100kSensor::<DummyAdc>::resistance_to_celsius(400_000.0),
            Err(SensorError::OutOfRange)
        );
        assert_eq!(
            Ntc100kSensor::<DummyAdc>::resistance_to_celsius(20.0),
            Err(SensorError::OutOfRange)
        );
    }

    #[test]
    fn test_read_room_temperature() {
        // 4096 * 100K / (4.7K + 100K) = 3912
        let temp = sensor(3912).read_celsius().unwrap();
        assert!(close(temp, 25.0, 0.5));
    }

    #[test]
    fn test_read_working_temperature() {
        // 4096 * 174 / (4700 + 174) = 146
        let temp = sensor(146).read_celsius().unwrap();
        assert!(close(temp, 300.0, 3.0));
    }

    #[test]
    fn test_open_circuit() {
        assert_eq!(sensor(4095).read_celsius(), Err(SensorError::OpenCircuit));
    }

    #[test]
    fn test_short_circuit() {
        assert_eq!(sensor(0).read_celsius(), Err(SensorError::ShortCircuit));
    }

    #[test]
    fn test_adc_failure() {
        struct FailingAdc;
        impl AdcReader for FailingAdc {
            fn read(&mut self) -> Result<u16, ()> {
                Err(())
            }
        }
        let mut sensor = Ntc100kSensor::new(FailingAdc, NtcConfig::default());
        assert_eq!(sensor.read_celsius(), Err(SensorError::ConversionError));
    }
}
