//! Token envelope version management
//!
//! The envelope carries only its version number; the key-derivation
//! parameters for each version live here.
//!
//! - Version 1: PBKDF2-HMAC-SHA256, 600,000 iterations (OWASP 2023)

/// Version 1: PBKDF2-HMAC-SHA256, 600,000 iterations
const VERSION_1_ITERATIONS: u32 = 600_000;

/// Envelope version written by `AesGcmCipher::encrypt`
pub const CURRENT_ENVELOPE_VERSION: u32 = 1;

/// Iterations for the current envelope version (calculated at compile time)
///
/// # Panics
/// Fails the build if `CURRENT_ENVELOPE_VERSION` has no iteration count.
#[allow(clippy::panic)]
pub const fn get_current_iterations() -> u32 {
    match get_pbkdf2_iterations(CURRENT_ENVELOPE_VERSION) {
        Some(iterations) => iterations,
        None => panic!("Invalid CURRENT_ENVELOPE_VERSION"),
    }
}

/// PBKDF2 iterations for the given envelope version, `None` if unknown.
pub const fn get_pbkdf2_iterations(version: u32) -> Option<u32> {
    match version {
        1 => Some(VERSION_1_ITERATIONS),
        _ => None,
    }
}
