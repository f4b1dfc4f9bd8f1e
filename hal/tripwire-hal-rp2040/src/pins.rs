//! Dynamic pin allocation for config-driven hardware setup
//!
//! Provides a way to get GPIO pins by number at runtime, so the monitored
//! pin can come from the configuration document rather than being
//! hardcoded.

use embassy_rp::gpio::AnyPin;
use embassy_rp::peripherals::{DMA_CH0, FLASH};
use embassy_rp::{Peri, Peripherals};

/// Number of user GPIOs on the RP2040
pub const GPIO_COUNT: u8 = 30;

/// Error when requesting a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinError {
    /// Pin number out of range (0-29 valid)
    InvalidPin,
}

/// Pin bank that holds all GPIO pins and allows lending them by number
pub struct PinBank {
    pins: [Peri<'static, AnyPin>; GPIO_COUNT as usize],
}

impl PinBank {
    /// Split the embassy peripherals into a pin bank and the rest
    ///
    /// After this call, GPIOs must be obtained through the bank.
    pub fn from_peripherals(p: Peripherals) -> (Self, RemainingPeripherals) {
        let bank = Self {
            pins: [
                p.PIN_0.into(),
                p.PIN_1.into(),
                p.PIN_2.into(),
                p.PIN_3.into(),
                p.PIN_4.into(),
                p.PIN_5.into(),
                p.PIN_6.into(),
                p.PIN_7.into(),
                p.PIN_8.into(),
                p.PIN_9.into(),
                p.PIN_10.into(),
                p.PIN_11.into(),
                p.PIN_12.into(),
                p.PIN_13.into(),
                p.PIN_14.into(),
                p.PIN_15.into(),
                p.PIN_16.into(),
                p.PIN_17.into(),
                p.PIN_18.into(),
                p.PIN_19.into(),
                p.PIN_20.into(),
                p.PIN_21.into(),
                p.PIN_22.into(),
                p.PIN_23.into(),
                p.PIN_24.into(),
                p.PIN_25.into(),
                p.PIN_26.into(),
                p.PIN_27.into(),
                p.PIN_28.into(),
                p.PIN_29.into(),
            ],
        };
        let remaining = RemainingPeripherals {
            flash: p.FLASH,
            dma_ch0: p.DMA_CH0,
        };
        (bank, remaining)
    }

    /// Borrow a pin by number
    ///
    /// The pin stays in the bank; reborrow it to build a driver for as long
    /// as it is needed, then drop the driver to hand it back.
    pub fn get_mut(&mut self, pin_num: u8) -> Result<&mut Peri<'static, AnyPin>, PinError> {
        if pin_num >= GPIO_COUNT {
            return Err(PinError::InvalidPin);
        }
        Ok(&mut self.pins[pin_num as usize])
    }
}

/// Non-GPIO peripherals that remain after creating PinBank
pub struct RemainingPeripherals {
    pub flash: Peri<'static, FLASH>,
    pub dma_ch0: Peri<'static, DMA_CH0>,
}
