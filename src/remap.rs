// File: src/remap.rs

use chrono::{Datelike, Utc};
use log::warn;

use crate::dates::{resolve_window_in, DateWindow};
use crate::error::DateError;
use crate::time::{format_timestamp, now_timestamp, parse_timestamp};

/// Moves `original` from `old_window` into `new_window`, keeping its absolute
/// offset from the window start. Both windows are resolved in `year`.
///
/// This is a translation, not a rescale: if the new window is shorter, the
/// result can land past its end.
pub fn try_remap_timestamp_in(
    original: &str,
    old_window: &DateWindow,
    new_window: &DateWindow,
    year: i32,
) -> Result<String, DateError> {
    let old_range = resolve_window_in(old_window, year)?;
    let new_range = resolve_window_in(new_window, year)?;

    let timestamp = parse_timestamp(original)?;
    let offset = timestamp - old_range.start;

    let remapped = new_range
        .start
        .checked_add_signed(offset)
        .ok_or_else(|| DateError::OutOfRange(original.to_string()))?;

    Ok(format_timestamp(&remapped))
}

/// Best-effort remap: on any failure the current instant is returned instead.
pub fn remap_timestamp_in(
    original: &str,
    old_window: &DateWindow,
    new_window: &DateWindow,
    year: i32,
) -> String {
    match try_remap_timestamp_in(original, old_window, new_window, year) {
        Ok(remapped) => remapped,
        Err(e) => {
            warn!("could not remap '{}' ({}), using current time", original, e);
            now_timestamp()
        }
    }
}

/// Best-effort remap with both windows resolved in the current UTC year.
pub fn remap_timestamp(original: &str, old_window: &DateWindow, new_window: &DateWindow) -> String {
    remap_timestamp_in(original, old_window, new_window, Utc::now().year())
}
