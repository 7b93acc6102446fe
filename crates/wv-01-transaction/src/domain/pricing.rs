//! # Transaction Pricing
//!
//! The minimum reward a transaction must carry, as a function of payload
//! size and network difficulty. Linear per byte below the 10 MiB threshold,
//! super-linear above it to price out oversized payloads.
//!
//! All arithmetic runs in U256: the per-byte constant sits near 2^52 and
//! the super-linear branch squares the size, which overflows 64-bit
//! arithmetic at large payloads.

use primitive_types::U256;

/// Winston per byte of payload: `WINSTON_PER_AR / BASE_BYTES_PER_AR`.
pub const COST_PER_BYTE: u64 = 1_000_000;

/// Difficulty at which the price curve is centered.
pub const DIFF_CENTER: u64 = 25;

/// Maximum combined size of the non-data fields, charged on every
/// transaction so empty-payload transactions are not free.
pub const BASE_FIELD_BYTES: u64 = 3208;

/// Payload size at which the super-linear branch engages.
pub const SUPER_LINEAR_THRESHOLD: u64 = 10 * 1024 * 1024;

/// Minimum reward in Winston for a payload of `data_size` bytes at network
/// difficulty `diff` (a positive integer). Integer division floors.
pub fn min_cost(data_size: u64, diff: u64) -> U256 {
    let size = U256::from(data_size);
    let base = (size + U256::from(BASE_FIELD_BYTES))
        * U256::from(COST_PER_BYTE)
        * U256::from(DIFF_CENTER);
    if data_size < SUPER_LINEAR_THRESHOLD {
        base / U256::from(diff)
    } else {
        size * base / (U256::from(diff) * U256::from(SUPER_LINEAR_THRESHOLD))
    }
}
