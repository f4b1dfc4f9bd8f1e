//! Tripwire - Digital Input Monitor Firmware
//!
//! Main firmware binary for RP2040 boards. Watches one GPIO for a
//! configurable edge or level, latches the first occurrence with a
//! timestamp, and reports it from a periodic task.

#![no_std]
#![no_main]

extern crate alloc;

use alloc::string::String;
use defmt::*;
use embassy_executor::Spawner;
use embassy_time::Delay;
use embedded_alloc::LlffHeap as Heap;
use {defmt_rtt as _, panic_probe as _};

use tripwire_core::{InputMonitor, TimeSyncPolicy};
use tripwire_hal::{ConfigSource, ConfigStore};
use tripwire_hal_rp2040::clock::EmbassyClock;
use tripwire_hal_rp2040::flash::FlashStorage;
use tripwire_hal_rp2040::input::Rp2040Inputs;
use tripwire_hal_rp2040::pins::{PinBank, GPIO_COUNT};

use crate::channels::{ARM, EPOCH, TRIGGER};

// Heap allocator for JSON encoding/decoding
#[global_allocator]
static HEAP: Heap = Heap::empty();

// Heap size: 8KB
const HEAP_SIZE: usize = 8 * 1024;

/// Embedded default configuration (compiled into firmware)
/// Edit input.json and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../input.json");

/// Wall-clock seed (epoch seconds at build time, 0 if unknown)
const BUILD_EPOCH: &str = env!("TRIPWIRE_BUILD_EPOCH");

mod channels;
mod tasks;

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Tripwire firmware starting...");

    init_heap();

    let p = embassy_rp::init(Default::default());
    let (pins, rest) = PinBank::from_peripherals(p);
    info!("Peripherals initialized");

    seed_wall_clock();

    let mut store = ConfigStore::new(FlashStorage::new(rest.flash, rest.dma_ch0), GPIO_COUNT);
    let (document, source) = load_config(&mut store).await;

    let mut inputs = Rp2040Inputs::new(&ARM);
    let mut monitor = InputMonitor::new(0, &TRIGGER, EmbassyClock, &EPOCH)
        .with_time_sync(TimeSyncPolicy::not_required());

    match monitor.set_config(&document, &mut inputs) {
        // Rewrite the document copy unless that is what was just applied
        Ok(()) if source != Some(ConfigSource::Document) => {
            match store.save(monitor.config()).await {
                Ok(()) => info!("Configuration saved to flash"),
                Err(e) => warn!("Saving configuration failed: {:?}", e),
            }
        }
        Ok(()) => {}
        Err(e) => error!("Input configuration failed: {:?}", e),
    }

    if let Err(e) = monitor.begin(&mut Delay).await {
        error!("Monitor start failed: {:?}", e);
    }
    info!("Monitor started on pin {}", monitor.config().pin);

    spawner.spawn(tasks::edge_task(pins)).unwrap();
    spawner.spawn(tasks::poll_task(monitor)).unwrap();

    info!("All tasks spawned, firmware running");

    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat, pending={}", TRIGGER.is_pending());
    }
}

/// Initialize the heap allocator
fn init_heap() {
    use core::mem::MaybeUninit;
    static mut HEAP_MEM: [MaybeUninit<u8>; HEAP_SIZE] = [MaybeUninit::uninit(); HEAP_SIZE];
    #[allow(static_mut_refs)]
    unsafe {
        HEAP.init(HEAP_MEM.as_ptr() as usize, HEAP_SIZE)
    }
}

/// Start the wall clock from the build time
///
/// Nothing on the board knows the real time, so reports are dated relative
/// to when the firmware was built until a time source sets `EPOCH`.
fn seed_wall_clock() {
    match BUILD_EPOCH.parse::<u64>() {
        Ok(secs) if secs > 0 => {
            EPOCH.set_epoch(secs);
            info!("Wall clock seeded at {}", secs);
        }
        _ => warn!("No build time available, wall clock unsynchronized"),
    }
}

/// Load the configuration document from flash storage
///
/// Falls back to the embedded default document when flash holds nothing
/// usable. The source is `None` for the embedded document.
async fn load_config(
    store: &mut ConfigStore<FlashStorage<'static>>,
) -> (String, Option<ConfigSource>) {
    match store.load().await {
        Ok((document, source)) => {
            info!("Loaded configuration from flash ({:?})", source);
            (document, Some(source))
        }
        Err(e) => {
            info!("No valid configuration in flash ({:?}), using embedded defaults", e);
            (String::from(EMBEDDED_CONFIG), None)
        }
    }
}
