//! Flash storage driver for RP2040
//!
//! Items live in a sequential-storage map in the last 16KB of flash, which
//! `memory.x` keeps out of the program region.

use embassy_rp::dma::Channel;
use embassy_rp::flash::{Async, Flash, ERASE_SIZE};
use embassy_rp::peripherals::FLASH;
use embassy_rp::Peri;
use sequential_storage::cache::NoCache;
use sequential_storage::map;

pub use tripwire_hal::flash::{FlashError, StorageKey};

/// 2MB flash on Pico boards
pub const FLASH_SIZE: usize = 2 * 1024 * 1024;
pub const CONFIG_PARTITION_SIZE: usize = 16 * 1024;
pub const CONFIG_PARTITION_START: usize = FLASH_SIZE - CONFIG_PARTITION_SIZE;

/// Largest stored item
pub const MAX_ITEM_SIZE: usize = tripwire_hal::config::MAX_DOCUMENT_BYTES;

// Key byte plus item header
const ITEM_OVERHEAD: usize = 16;

// sequential-storage needs at least two erasable pages
const _: () = assert!(CONFIG_PARTITION_SIZE >= 2 * ERASE_SIZE);

/// Flash range for the config partition
pub const CONFIG_RANGE: core::ops::Range<u32> =
    (CONFIG_PARTITION_START as u32)..(FLASH_SIZE as u32);

/// Config partition on the RP2040's QSPI flash
pub struct Rp2040FlashStorage<'d> {
    flash: Flash<'d, FLASH, Async, FLASH_SIZE>,
}

impl<'d> Rp2040FlashStorage<'d> {
    pub fn new(flash: Peri<'d, FLASH>, dma: Peri<'d, impl Channel>) -> Self {
        Self {
            flash: Flash::new(flash, dma),
        }
    }
}

fn storage_error<E>(e: sequential_storage::Error<E>) -> FlashError {
    match e {
        sequential_storage::Error::FullStorage => FlashError::Full,
        sequential_storage::Error::Corrupted { .. } => FlashError::Corrupted,
        sequential_storage::Error::ItemTooBig => FlashError::TooLarge,
        _ => FlashError::Storage,
    }
}

impl<'d> tripwire_hal::FlashStorage for Rp2040FlashStorage<'d> {
    async fn read(&mut self, key: StorageKey, buffer: &mut [u8]) -> Result<usize, FlashError> {
        let mut data_buffer = [0u8; MAX_ITEM_SIZE + ITEM_OVERHEAD];

        let data = map::fetch_item::<StorageKey, &[u8], _>(
            &mut self.flash,
            CONFIG_RANGE,
            &mut NoCache::new(),
            &mut data_buffer,
            &key,
        )
        .await
        .map_err(storage_error)?
        .ok_or(FlashError::NotFound)?;

        let dst = buffer
            .get_mut(..data.len())
            .ok_or(FlashError::BufferTooSmall)?;
        dst.copy_from_slice(data);
        Ok(data.len())
    }

    async fn write(&mut self, key: StorageKey, data: &[u8]) -> Result<(), FlashError> {
        if data.len() > MAX_ITEM_SIZE {
            return Err(FlashError::TooLarge);
        }
        let mut data_buffer = [0u8; MAX_ITEM_SIZE + ITEM_OVERHEAD];

        map::store_item(
            &mut self.flash,
            CONFIG_RANGE,
            &mut NoCache::new(),
            &mut data_buffer,
            &key,
            &data,
        )
        .await
        .map_err(storage_error)?;

        #[cfg(feature = "defmt")]
        defmt::debug!("Stored {} bytes under {}", data.len(), key);
        Ok(())
    }
}

/// Board flash storage
pub type FlashStorage<'d> = Rp2040FlashStorage<'d>;
