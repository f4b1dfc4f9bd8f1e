//! Build script for tripwire-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates input.json at compile time
//! - Records the build time as the wall-clock seed

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// User GPIOs on the RP2040
const GPIO_COUNT: u8 = 30;

fn main() {
    setup_linker();
    validate_config();
    record_build_epoch();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate the embedded input.json document at compile time
///
/// Uses the same decoder as the firmware, so anything that passes here is
/// accepted by `InputMonitor::set_config` at boot.
fn validate_config() {
    println!("cargo:rerun-if-changed=input.json");

    let config_path = Path::new("input.json");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: input.json not found!                                    ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds a default input configuration document.     ║\n\
            ║  Please create one in the tripwire-firmware directory.           ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let document = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read input.json                                ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config = match tripwire_core::config::decode(&document) {
        Ok(config) => config,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid input.json                                       ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(describe(e))
            );
        }
    };

    if config.pin >= GPIO_COUNT {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid input.json                                       ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            format_error_lines(&format!(
                "Pin {} does not exist (RP2040 has GPIO 0-{})",
                config.pin,
                GPIO_COUNT - 1
            ))
        );
    }

    println!("cargo:warning=input.json validated successfully");
}

/// Export the build time (epoch seconds) as TRIPWIRE_BUILD_EPOCH
///
/// Honors SOURCE_DATE_EPOCH for reproducible builds.
fn record_build_epoch() {
    println!("cargo:rerun-if-env-changed=SOURCE_DATE_EPOCH");

    let secs = env::var("SOURCE_DATE_EPOCH")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .ok()
                .map(|d| d.as_secs())
        })
        .unwrap_or(0);

    println!("cargo:rustc-env=TRIPWIRE_BUILD_EPOCH={}", secs);
}

/// Human-readable decode error
fn describe(e: tripwire_core::config::DecodeError) -> &'static str {
    use tripwire_core::config::DecodeError;

    match e {
        DecodeError::Syntax => "Malformed JSON, or a field is missing or has the wrong type",
        DecodeError::UnknownMode => "Mode.current is not a known pin mode",
        DecodeError::UnknownTrigger => "Trigger.current is not a known trigger type",
        DecodeError::NameTooLong => "taskName is longer than 32 characters",
    }
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
