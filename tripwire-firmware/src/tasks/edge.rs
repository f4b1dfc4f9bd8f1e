//! Edge detection task
//!
//! Owns the GPIO bank. Builds an `Input` for the armed pin and waits for the
//! armed condition; every completion is an "interrupt" that claims the
//! shared trigger state. A new arm request drops the current input and
//! starts over with the new pin.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_rp::gpio::Input;
use tripwire_core::traits::MonotonicClock;
use tripwire_hal_rp2040::clock::EmbassyClock;
use tripwire_hal_rp2040::input::{pull_for, wait_for_trigger};
use tripwire_hal_rp2040::pins::PinBank;

use crate::channels::{ARM, TRIGGER};

#[embassy_executor::task]
pub async fn edge_task(mut pins: PinBank) {
    info!("Edge task started");

    let mut request = ARM.wait().await;

    loop {
        let peri = match pins.get_mut(request.pin) {
            Ok(peri) => peri,
            Err(e) => {
                warn!("Cannot arm pin {}: {}", request.pin, e);
                request = ARM.wait().await;
                continue;
            }
        };

        let mut input = Input::new(peri.reborrow(), pull_for(request.mode));
        info!(
            "Pin {} armed: {} / {}",
            request.pin,
            request.mode.name(),
            request.trigger.name()
        );

        loop {
            match select(ARM.wait(), wait_for_trigger(&mut input, request.trigger)).await {
                Either::First(next) => {
                    request = next;
                    break;
                }
                Either::Second(()) => {
                    TRIGGER.claim(|| EmbassyClock.now_micros());
                }
            }
        }
    }
}
