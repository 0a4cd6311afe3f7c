//! Tip thermistor ADC channel

use embassy_rp::adc::{Adc, Blocking, Channel};

use calor_drivers::sensor::AdcReader;

/// One ADC channel read in blocking mode
pub struct TipAdc {
    adc: Adc<'static, Blocking>,
    channel: Channel<'static>,
}

impl TipAdc {
    pub fn new(adc: Adc<'static, Blocking>, channel: Channel<'static>) -> Self {
        Self { adc, channel }
    }
}

impl AdcReader for TipAdc {
    fn read(&mut self) -> Result<u16, ()> {
        self.adc.blocking_read(&mut self.channel).map_err(|_| ())
    }
}
