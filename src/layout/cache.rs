//! Measurement cache - When an earlier result answers a new request.
//!
//! A node keeps one slot for its last full layout and a ring of
//! [`MAX_CACHED_RESULT_COUNT`] slots for measurements. A cached result is
//! reused when the new request is equivalent to, or provably answered by,
//! the request that produced it.

use crate::engine::Config;
use crate::types::MeasureMode;
use crate::utils::floats_equal;

use super::rounding::round_value_to_pixel_grid;
use super::types::{CachedMeasurement, Layout, MAX_CACHED_RESULT_COUNT};

/// One `(available size, mode)` request along both axes, together with the
/// sizes percentages resolve against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct MeasureRequest {
    pub available_width: Option<f32>,
    pub width_mode: MeasureMode,
    pub available_height: Option<f32>,
    pub height_mode: MeasureMode,
    pub parent_width: Option<f32>,
    pub parent_height: Option<f32>,
}

impl MeasureRequest {
    /// Percent margins, padding and sizes resolve the same way as for `entry`.
    fn same_parent_size(&self, entry: &CachedMeasurement) -> bool {
        floats_equal(entry.parent_width, self.parent_width) && floats_equal(entry.parent_height, self.parent_height)
    }

    /// Same modes and sizes as the cached entry.
    fn matches_exactly(&self, entry: &CachedMeasurement) -> bool {
        entry.width_mode == Some(self.width_mode)
            && entry.height_mode == Some(self.height_mode)
            && floats_equal(entry.available_width, self.available_width)
            && floats_equal(entry.available_height, self.available_height)
            && self.same_parent_size(entry)
    }

    fn to_entry(self, computed_width: Option<f32>, computed_height: Option<f32>) -> CachedMeasurement {
        CachedMeasurement {
            available_width: self.available_width,
            available_height: self.available_height,
            width_mode: Some(self.width_mode),
            height_mode: Some(self.height_mode),
            computed_width,
            computed_height,
            parent_width: self.parent_width,
            parent_height: self.parent_height,
        }
    }
}

/// An exact request for the size the node already has.
fn size_is_exact_and_matches_old_measured_size(mode: MeasureMode, size: Option<f32>, last_computed: f32) -> bool {
    mode == MeasureMode::Exactly && floats_equal(size, Some(last_computed))
}

/// The old request was unconstrained and its result fits the new bound.
fn old_size_is_unspecified_and_still_fits(
    mode: MeasureMode,
    size: Option<f32>,
    last_mode: MeasureMode,
    last_computed: f32,
) -> bool {
    mode == MeasureMode::AtMost
        && last_mode == MeasureMode::Undefined
        && size.is_some_and(|size| size >= last_computed || floats_equal(Some(size), Some(last_computed)))
}

/// The new bound is tighter than the old one but the old result still fits.
fn new_size_is_stricter_and_still_valid(
    mode: MeasureMode,
    size: Option<f32>,
    last_mode: MeasureMode,
    last_size: Option<f32>,
    last_computed: f32,
) -> bool {
    match (size, last_size) {
        (Some(size), Some(last_size)) => {
            last_mode == MeasureMode::AtMost
                && mode == MeasureMode::AtMost
                && last_size > size
                && (last_computed <= size || floats_equal(Some(size), Some(last_computed)))
        }
        _ => false,
    }
}

/// Whether `entry` answers `request` for a node with the given margins.
///
/// Sizes are compared on the pixel grid when the config rounds output, so
/// requests that only differ below a device pixel share results.
pub(crate) fn can_use_cached_measurement(
    request: &MeasureRequest,
    entry: &CachedMeasurement,
    margin_row: f32,
    margin_column: f32,
    config: &Config,
) -> bool {
    let (Some(last_width_mode), Some(last_height_mode)) = (entry.width_mode, entry.height_mode) else {
        return false;
    };
    let (Some(last_computed_width), Some(last_computed_height)) = (entry.computed_width, entry.computed_height) else {
        return false;
    };
    if last_computed_width < 0.0 || last_computed_height < 0.0 || !request.same_parent_size(entry) {
        return false;
    }

    let scale = config.point_scale_factor;
    let effective = |value: Option<f32>| {
        if scale != 0.0 {
            value.map(|v| round_value_to_pixel_grid(v, scale, false, false))
        } else {
            value
        }
    };

    let has_same_width_spec = last_width_mode == request.width_mode
        && floats_equal(effective(entry.available_width), effective(request.available_width));
    let has_same_height_spec = last_height_mode == request.height_mode
        && floats_equal(effective(entry.available_height), effective(request.available_height));

    let width = request.available_width.map(|w| w - margin_row);
    let height = request.available_height.map(|h| h - margin_column);

    let width_is_compatible = has_same_width_spec
        || size_is_exact_and_matches_old_measured_size(request.width_mode, width, last_computed_width)
        || old_size_is_unspecified_and_still_fits(request.width_mode, width, last_width_mode, last_computed_width)
        || new_size_is_stricter_and_still_valid(
            request.width_mode,
            width,
            last_width_mode,
            entry.available_width,
            last_computed_width,
        );

    let height_is_compatible = has_same_height_spec
        || size_is_exact_and_matches_old_measured_size(request.height_mode, height, last_computed_height)
        || old_size_is_unspecified_and_still_fits(request.height_mode, height, last_height_mode, last_computed_height)
        || new_size_is_stricter_and_still_valid(
            request.height_mode,
            height,
            last_height_mode,
            entry.available_height,
            last_computed_height,
        );

    width_is_compatible && height_is_compatible
}

impl Layout {
    /// Find a cached result for `request`.
    ///
    /// Measured leaves accept any compatible entry; containers only reuse an
    /// identical request, from the layout slot when laying out and from the
    /// measurement ring otherwise.
    pub(crate) fn find_cached(
        &self,
        request: &MeasureRequest,
        is_measured_leaf: bool,
        perform_layout: bool,
        margins: (f32, f32),
        config: &Config,
    ) -> Option<CachedMeasurement> {
        let filled = &self.cached_measurements[..self.next_cached_measurements_index];
        if is_measured_leaf {
            let (margin_row, margin_column) = margins;
            std::iter::once(&self.cached_layout)
                .chain(filled)
                .find(|entry| can_use_cached_measurement(request, entry, margin_row, margin_column, config))
                .copied()
        } else if perform_layout {
            request.matches_exactly(&self.cached_layout).then_some(self.cached_layout)
        } else {
            filled.iter().find(|entry| request.matches_exactly(entry)).copied()
        }
    }

    /// Record a fresh result in the layout slot or the next measurement slot.
    ///
    /// The ring wraps around once all slots are taken.
    pub(crate) fn store_cached(&mut self, request: MeasureRequest, perform_layout: bool) {
        let entry = request.to_entry(self.measured_dimensions.width, self.measured_dimensions.height);
        if perform_layout {
            self.cached_layout = entry;
            return;
        }
        if self.next_cached_measurements_index == MAX_CACHED_RESULT_COUNT {
            log::trace!("measurement cache full, wrapping around");
            self.next_cached_measurements_index = 0;
        }
        self.cached_measurements[self.next_cached_measurements_index] = entry;
        self.next_cached_measurements_index += 1;
    }
}
