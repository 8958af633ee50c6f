//! spilink-ffi: C-ABI exports for the spilink request engine.

mod args;
mod checksum;
mod error;
mod link;
mod types;

use std::panic::AssertUnwindSafe;

pub use checksum::{spilink_checksum, spilink_crc32};
pub use link::{spilink_close, spilink_open, spilink_send_request};
pub use types::{
    SpilinkCallback, SpilinkHandle, SpilinkResponse, SpilinkStatus, SPILINK_ERROR_CRC_MISMATCH,
    SPILINK_ERROR_INTERNAL, SPILINK_ERROR_INVALID_ARGUMENT, SPILINK_ERROR_INVALID_FORMAT,
    SPILINK_ERROR_UNKNOWN, SPILINK_MAX_PAYLOAD_SIZE, SPILINK_SUCCESS,
};

fn ffi_boundary<T>(on_panic: T, f: impl FnOnce() -> T) -> T {
    match std::panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => value,
        Err(_) => {
            error::set_panic_error();
            on_panic
        }
    }
}

#[no_mangle]
pub extern "C" fn spilink_cleanup() {
    ffi_boundary((), || {
        error::clear_error_state();
    });
}

#[no_mangle]
pub extern "C" fn spilink_last_error() -> *const std::os::raw::c_char {
    ffi_boundary(std::ptr::null(), error::last_error_ptr)
}
