use std::ffi::c_void;
use std::os::raw::c_char;

use spilink_engine::{Outcome, RequestEngine};
use tracing::debug;

use crate::args;
use crate::error;
use crate::types::{
    BoxedGate, BoxedPort, LinkHandle, SpilinkCallback, SpilinkHandle, SpilinkResponse,
    SpilinkStatus,
};

fn with_link_mut<T>(handle: SpilinkHandle, on_error: T, f: impl FnOnce(&mut LinkHandle) -> T) -> T {
    if handle.is_null() {
        let _ = error::set_invalid_argument("link handle cannot be null");
        return on_error;
    }

    let link = {
        // SAFETY: Pointer validity is guaranteed by the caller.
        unsafe { &mut *(handle as *mut LinkHandle) }
    };

    f(link)
}

pub(crate) fn into_handle(engine: RequestEngine<BoxedPort, BoxedGate>) -> SpilinkHandle {
    Box::into_raw(Box::new(LinkHandle { engine })) as SpilinkHandle
}

#[cfg(target_os = "linux")]
fn open_link(spi_path: &str, gpio_chip: &str, gpio_line: u32) -> Result<SpilinkHandle, String> {
    use spilink_transport::{EdgeGate, GpioConfig, SpiConfig, SpidevPort};

    let port = SpidevPort::open(SpiConfig::new(spi_path)).map_err(|err| err.to_string())?;
    let gate =
        EdgeGate::open(GpioConfig::new(gpio_chip, gpio_line)).map_err(|err| err.to_string())?;
    Ok(into_handle(RequestEngine::new(Box::new(port), Box::new(gate))))
}

#[cfg(not(target_os = "linux"))]
fn open_link(_spi_path: &str, _gpio_chip: &str, _gpio_line: u32) -> Result<SpilinkHandle, String> {
    Err("spidev and gpio character devices require Linux".to_string())
}

/// Open the SPI device and the ready line, returning a link handle.
///
/// Returns null on failure; see `spilink_last_error`.
///
/// # Safety
/// `spi_path` and `gpio_chip` must be non-null pointers to valid UTF-8,
/// NUL-terminated C strings.
#[no_mangle]
pub unsafe extern "C" fn spilink_open(
    spi_path: *const c_char,
    gpio_chip: *const c_char,
    gpio_line: u32,
) -> SpilinkHandle {
    crate::ffi_boundary(std::ptr::null_mut(), || {
        error::clear_error_state();

        // SAFETY: We validate null and UTF-8 in helper.
        let Some(spi_path) = (unsafe { args::required_str_arg(spi_path, "spi_path") }) else {
            return std::ptr::null_mut();
        };
        // SAFETY: We validate null and UTF-8 in helper.
        let Some(gpio_chip) = (unsafe { args::required_str_arg(gpio_chip, "gpio_chip") }) else {
            return std::ptr::null_mut();
        };

        match open_link(spi_path, gpio_chip, gpio_line) {
            Ok(handle) => handle,
            Err(message) => {
                error::set_error_message(message);
                std::ptr::null_mut()
            }
        }
    })
}

/// Release a link handle, closing the SPI device and the GPIO line.
///
/// # Safety
/// `handle` must be null or a handle previously returned by `spilink_open`.
#[no_mangle]
pub unsafe extern "C" fn spilink_close(handle: SpilinkHandle) {
    crate::ffi_boundary((), || {
        if handle.is_null() {
            return;
        }

        // SAFETY: Caller guarantees this handle was allocated by spilink_open.
        unsafe {
            drop(Box::from_raw(handle as *mut LinkHandle));
        }
    });
}

/// Send a request and deliver the response through `callback`.
///
/// `callback` runs exactly once, before this function returns, unless the
/// arguments are rejected up front (`SPILINK_ERROR_INVALID_ARGUMENT`). The
/// returned status equals the status passed to the callback.
///
/// # Safety
/// `handle` must be a valid handle from `spilink_open`. If `payload_size > 0`,
/// `payload` must be readable for `payload_size` bytes. A handle must not be
/// used from two threads at once.
#[no_mangle]
pub unsafe extern "C" fn spilink_send_request(
    handle: SpilinkHandle,
    function_id: u8,
    payload: *const u8,
    payload_size: u16,
    callback: SpilinkCallback,
    user_data: *mut c_void,
) -> SpilinkStatus {
    crate::ffi_boundary(SpilinkStatus::Internal, || {
        error::clear_error_state();

        let Some(callback) = callback else {
            return error::set_invalid_argument("callback cannot be null");
        };
        // SAFETY: Pointer and length come from the caller, validated in helper.
        let Some(payload) = (unsafe { args::bytes_arg(payload, payload_size as usize, "payload") })
        else {
            return SpilinkStatus::InvalidArgument;
        };

        with_link_mut(handle, SpilinkStatus::InvalidArgument, |link| {
            let outcome = link.engine.request(function_id, payload);
            let mut status = error::record_outcome(&outcome);
            let view = match &outcome {
                Outcome::Success(response) => {
                    let view = SpilinkResponse::view(response);
                    if view.is_none() {
                        error::set_error_message(format!(
                            "response payload of {} bytes exceeds the C length field",
                            response.payload.len()
                        ));
                        status = SpilinkStatus::Internal;
                    }
                    view
                }
                _ => None,
            };
            debug!(function_id, ?status, "request complete");

            let response = view
                .as_ref()
                .map_or(std::ptr::null(), |view| view as *const SpilinkResponse);
            // SAFETY: `response` is null or points to `view`, which borrows the
            // engine's receive buffer and outlives the call.
            unsafe { callback(status, response, user_data) };
            status
        })
    })
}
