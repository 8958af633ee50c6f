use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::c_char;

use spilink_engine::Outcome;

use crate::types::SpilinkStatus;

thread_local! {
    /// Message for the most recent failed call on this thread. Empty after a
    /// successful call.
    static LAST_ERROR: RefCell<CString> = RefCell::new(CString::default());
}

pub(crate) fn clear_error_state() {
    LAST_ERROR.with(|state| *state.borrow_mut() = CString::default());
}

pub(crate) fn set_error_message(message: impl Into<String>) {
    // Interior NULs would truncate the C string.
    let text = message.into().replace('\0', "?");
    LAST_ERROR.with(|state| {
        *state.borrow_mut() = CString::new(text).unwrap_or_default();
    });
}

pub(crate) fn set_invalid_argument(message: impl Into<String>) -> SpilinkStatus {
    set_error_message(message);
    SpilinkStatus::InvalidArgument
}

/// Map an exchange outcome to its status, recording the failure text.
pub(crate) fn record_outcome(outcome: &Outcome<'_>) -> SpilinkStatus {
    let status = SpilinkStatus::from(outcome.kind());
    if !outcome.is_success() {
        set_error_message(outcome.to_string());
    }
    status
}

pub(crate) fn set_panic_error() {
    set_error_message("panic across FFI boundary");
}

pub(crate) fn last_error_ptr() -> *const c_char {
    LAST_ERROR.with(|state| state.borrow().as_ptr())
}
