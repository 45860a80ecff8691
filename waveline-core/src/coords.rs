//! Coordinate transform
//!
//! Pure conversions between pointer pixels, timeline seconds and sample
//! counts. Nothing here clamps; callers decide what an out-of-range value means.

use sync_backend::Samples;

/// Narrowest zoom, in pixels per second
pub const MIN_PIXELS_PER_SECOND: f64 = 1.0;
/// Widest zoom, in pixels per second
pub const MAX_PIXELS_PER_SECOND: f64 = 500.0;

/// Which track row a vertical pointer position falls on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackRow {
    /// Over the ruler (or above the first track)
    AboveTracks,
    /// Row index in layout order; may exceed the number of tracks
    Index(usize),
}

/// Convert a pointer x-coordinate to timeline seconds
pub fn time_from_pixel(x: f64, scroll_offset: f64, pixels_per_second: f64) -> f64 {
    (x + scroll_offset) / pixels_per_second
}

/// Convert timeline seconds to a pointer x-coordinate
pub fn pixel_from_time(seconds: f64, scroll_offset: f64, pixels_per_second: f64) -> f64 {
    seconds * pixels_per_second - scroll_offset
}

/// Convert a pointer y-coordinate to a track row
pub fn track_index_from_pixel(
    y: f64,
    scroll_offset_y: f64,
    ruler_height: f64,
    track_height: f64,
) -> TrackRow {
    if y < ruler_height {
        return TrackRow::AboveTracks;
    }
    let relative_y = y - ruler_height + scroll_offset_y;
    if relative_y < 0.0 {
        return TrackRow::AboveTracks;
    }
    TrackRow::Index((relative_y / track_height).floor() as usize)
}

/// Top edge of a track row in pointer coordinates
pub fn pixel_from_track_index(
    index: usize,
    scroll_offset_y: f64,
    ruler_height: f64,
    track_height: f64,
) -> f64 {
    ruler_height + index as f64 * track_height - scroll_offset_y
}

/// Seconds to samples, rounded to the nearest sample
pub fn samples_from_seconds(seconds: f64, sample_rate: u32) -> Samples {
    (seconds * sample_rate as f64).round() as Samples
}

/// Samples to seconds
pub fn seconds_from_samples(samples: Samples, sample_rate: u32) -> f64 {
    samples as f64 / sample_rate as f64
}

/// Scroll and zoom state of the timeline view
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Horizontal scroll, in pixels
    pub scroll_x: f64,
    /// Vertical scroll, in pixels
    pub scroll_y: f64,
    pub pixels_per_second: f64,
    pub ruler_height: f64,
    pub track_height: f64,
    pub sample_rate: u32,
}

impl Viewport {
    pub fn new(pixels_per_second: f64, ruler_height: f64, track_height: f64, sample_rate: u32) -> Self {
        Self {
            scroll_x: 0.0,
            scroll_y: 0.0,
            pixels_per_second,
            ruler_height,
            track_height,
            sample_rate,
        }
    }

    /// Timeline position under a pointer x-coordinate
    pub fn samples_at(&self, x: f64) -> Samples {
        samples_from_seconds(
            time_from_pixel(x, self.scroll_x, self.pixels_per_second),
            self.sample_rate,
        )
    }

    /// Pointer x-coordinate of a timeline position
    pub fn x_for_samples(&self, samples: Samples) -> f64 {
        pixel_from_time(
            seconds_from_samples(samples, self.sample_rate),
            self.scroll_x,
            self.pixels_per_second,
        )
    }

    /// Track row under a pointer y-coordinate
    pub fn row_at(&self, y: f64) -> TrackRow {
        track_index_from_pixel(y, self.scroll_y, self.ruler_height, self.track_height)
    }

    /// Zoom by `zoom_delta` (0.2 = 20% closer) keeping the time under `anchor_x` stationary
    pub fn zoom_at(&mut self, zoom_delta: f64, anchor_x: f64) {
        let time_at_anchor = time_from_pixel(anchor_x, self.scroll_x, self.pixels_per_second);
        self.pixels_per_second = (self.pixels_per_second * (1.0 + zoom_delta))
            .clamp(MIN_PIXELS_PER_SECOND, MAX_PIXELS_PER_SECOND);
        self.scroll_x = (time_at_anchor * self.pixels_per_second - anchor_x).max(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_pixel_inverse() {
        let seconds = time_from_pixel(250.0, 50.0, 100.0);
        assert_eq!(seconds, 3.0);
        assert_eq!(pixel_from_time(seconds, 50.0, 100.0), 250.0);
    }

    #[test]
    fn test_track_rows() {
        assert_eq!(track_index_from_pixel(10.0, 0.0, 30.0, 60.0), TrackRow::AboveTracks);
        assert_eq!(track_index_from_pixel(30.0, 0.0, 30.0, 60.0), TrackRow::Index(0));
        assert_eq!(track_index_from_pixel(95.0, 0.0, 30.0, 60.0), TrackRow::Index(1));
        assert_eq!(track_index_from_pixel(35.0, 120.0, 30.0, 60.0), TrackRow::Index(2));
        assert_eq!(pixel_from_track_index(2, 120.0, 30.0, 60.0), 30.0);
    }

    #[test]
    fn test_samples_round() {
        assert_eq!(samples_from_seconds(1.0, 44_100), 44_100);
        assert_eq!(samples_from_seconds(0.00002, 44_100), 1);
        assert_eq!(seconds_from_samples(22_050, 44_100), 0.5);
    }

    #[test]
    fn test_zoom_keeps_anchor_time() {
        let mut viewport = Viewport::new(100.0, 30.0, 60.0, 44_100);
        viewport.scroll_x = 200.0;
        let before = time_from_pixel(300.0, viewport.scroll_x, viewport.pixels_per_second);
        viewport.zoom_at(1.0, 300.0);
        assert_eq!(viewport.pixels_per_second, 200.0);
        let after = time_from_pixel(300.0, viewport.scroll_x, viewport.pixels_per_second);
        assert!((before - after).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut viewport = Viewport::new(400.0, 30.0, 60.0, 44_100);
        viewport.zoom_at(1.0, 0.0);
        assert_eq!(viewport.pixels_per_second, MAX_PIXELS_PER_SECOND);
    }
}
