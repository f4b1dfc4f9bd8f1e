//! Interrupt arming for RP2040 GPIO inputs
//!
//! Every RP2040 GPIO can raise edge and level interrupts through the IO
//! bank. Embassy owns the IO_IRQ_BANK0 handler and exposes it as `Input`
//! wait futures, so "attaching an interrupt" here means telling the edge
//! task which pin, pull and condition to wait on. The edge task then calls
//! `TriggerState::claim` when the future completes.
//!
//! ```text
//! set_config ──▶ Rp2040Inputs::attach_interrupt ──▶ ArmSignal
//!                                                      │
//!                          edge task: Input::wait_for_* ◀┘
//!                                       │
//!                                       ▼
//!                              TriggerState::claim
//! ```

use embassy_rp::gpio::{Input, Pull};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use tripwire_core::config::{PinMode, TriggerType};
use tripwire_core::traits::{InputError, InterruptInput};

use crate::pins::GPIO_COUNT;

/// Pin, pull and condition the edge task should wait on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ArmRequest {
    pub pin: u8,
    pub mode: PinMode,
    pub trigger: TriggerType,
}

/// Latest arm request (older requests are overwritten)
pub type ArmSignal = Signal<CriticalSectionRawMutex, ArmRequest>;

/// Map an electrical mode to the input pull setting
///
/// The IO bank has no open-drain input; an open-drain line is read with the
/// pulls disabled and relies on the external pull resistor.
pub fn pull_for(mode: PinMode) -> Pull {
    match mode {
        PinMode::Input | PinMode::OpenDrain => Pull::None,
        PinMode::Pullup => Pull::Up,
        PinMode::Pulldown => Pull::Down,
    }
}

/// Board-side [`InterruptInput`] for the RP2040
///
/// Holds the requested mode per pin and forwards attachments to the edge
/// task through an [`ArmSignal`].
pub struct Rp2040Inputs<'a> {
    arm: &'a ArmSignal,
    modes: [PinMode; GPIO_COUNT as usize],
}

impl<'a> Rp2040Inputs<'a> {
    pub fn new(arm: &'a ArmSignal) -> Self {
        Self {
            arm,
            modes: [PinMode::Input; GPIO_COUNT as usize],
        }
    }
}

impl InterruptInput for Rp2040Inputs<'_> {
    fn configure_pin(&mut self, pin: u8, mode: PinMode) -> Result<(), InputError> {
        let slot = self
            .modes
            .get_mut(pin as usize)
            .ok_or(InputError::InvalidPin)?;
        *slot = mode;
        Ok(())
    }

    fn supports_interrupt(&self, pin: u8) -> bool {
        pin < GPIO_COUNT
    }

    fn attach_interrupt(&mut self, pin: u8, trigger: TriggerType) -> Result<(), InputError> {
        let mode = *self
            .modes
            .get(pin as usize)
            .ok_or(InputError::InvalidPin)?;

        #[cfg(feature = "defmt")]
        if trigger.wakes() {
            defmt::debug!("Pin {}: wake-from-sleep requested, armed as plain level", pin);
        }

        self.arm.signal(ArmRequest { pin, mode, trigger });
        Ok(())
    }
}

/// Wait until `input` meets the trigger condition
///
/// Level conditions complete immediately while the level is held, so a
/// caller looping on this sees the line fire repeatedly, like a level
/// interrupt. [`TriggerType::Disabled`] never completes.
pub async fn wait_for_trigger(input: &mut Input<'_>, trigger: TriggerType) {
    match trigger {
        TriggerType::Disabled => core::future::pending().await,
        TriggerType::Rising => input.wait_for_rising_edge().await,
        TriggerType::Falling => input.wait_for_falling_edge().await,
        TriggerType::Change => input.wait_for_any_edge().await,
        TriggerType::Low | TriggerType::LowWithWakeup => input.wait_for_low().await,
        TriggerType::High | TriggerType::HighWithWakeup => input.wait_for_high().await,
    }
}
