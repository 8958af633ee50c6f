use crate::args;

/// CRC-32 of `len` bytes at `data`.
///
/// # Safety
/// If `len > 0`, `data` must be non-null and readable for `len` bytes.
#[no_mangle]
pub unsafe extern "C" fn spilink_crc32(data: *const u8, len: usize) -> u32 {
    crate::ffi_boundary(0, || {
        // SAFETY: Forwarded caller guarantee.
        match unsafe { args::bytes_arg(data, len, "data") } {
            Some(bytes) => spilink_frame::crc32(bytes),
            None => 0,
        }
    })
}

/// Frame check byte (low byte of the CRC-32) of `len` bytes at `data`.
///
/// # Safety
/// If `len > 0`, `data` must be non-null and readable for `len` bytes.
#[no_mangle]
pub unsafe extern "C" fn spilink_checksum(data: *const u8, len: usize) -> u8 {
    crate::ffi_boundary(0, || {
        // SAFETY: Forwarded caller guarantee.
        match unsafe { args::bytes_arg(data, len, "data") } {
            Some(bytes) => spilink_frame::checksum(bytes),
            None => 0,
        }
    })
}
