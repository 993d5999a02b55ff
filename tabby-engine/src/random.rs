//! Uniform random draws for the value generators.
//!
//! Draws come from operating system entropy. If entropy cannot be read the
//! draw degrades to a clock-derived value; generated data is test data, so a
//! weaker value is preferred over aborting a run.

use rand::rngs::OsRng;
use rand::RngCore;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::warn;

/// Source of uniform integers in `[0, max)`
pub trait RandomSource: Send + Sync {
    /// Uniform value in `[0, max)`; returns 0 when `max` is 0
    fn below(&self, max: u64) -> u64;

    /// Uniform index into a non-empty slice
    fn pick<'a>(&self, pool: &'a [&'a str]) -> &'a str {
        pool[self.below(pool.len() as u64) as usize]
    }
}

/// OS entropy backed source with a clock fallback
#[derive(Debug, Default, Clone, Copy)]
pub struct SecureRandom;

static DEGRADED_WARNED: AtomicBool = AtomicBool::new(false);

impl SecureRandom {
    pub fn new() -> Self {
        Self
    }

    fn next_u64(&self) -> Option<u64> {
        let mut buf = [0u8; 8];
        match OsRng.try_fill_bytes(&mut buf) {
            Ok(()) => Some(u64::from_le_bytes(buf)),
            Err(e) => {
                if !DEGRADED_WARNED.swap(true, Ordering::Relaxed) {
                    warn!("⚠️ OS randomness unavailable ({}), falling back to clock-derived values", e);
                }
                None
            }
        }
    }
}

impl RandomSource for SecureRandom {
    fn below(&self, max: u64) -> u64 {
        if max == 0 {
            return 0;
        }

        // Reject the tail of the u64 range so every residue is equally likely
        let zone = u64::MAX - (u64::MAX % max);
        loop {
            match self.next_u64() {
                Some(value) if value < zone => return value % max,
                Some(_) => continue,
                None => return clock_fallback(max),
            }
        }
    }
}

fn clock_fallback(max: u64) -> u64 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    (nanos % max as u128) as u64
}
