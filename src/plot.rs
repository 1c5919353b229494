//! Data plots
//!
//! Renders a series of samples into a rectangular plot area. Every kind
//! shares the same scaling: the area's middle row is the `median` value and
//! `max` is the distance from the median that reaches the top edge.

use crate::framebuffer::FrameBuffer;

/// Plot area and samples
///
/// ```rust
/// use ssd1306_pio::Plot;
///
/// let samples = [0, 40, 80, 120, 80, 40];
/// let plot = Plot::new(0, 15, 64, 32, &samples, 120).median(26);
/// assert_eq!(plot.data().len(), 6);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Plot<'a> {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
    data: &'a [i32],
    max: i32,
    median: i32,
}

impl<'a> Plot<'a> {
    /// Describe a plot area at (x, y) with scale `max`
    ///
    /// A `max` of zero or below is treated as 1.
    pub const fn new(x: i32, y: i32, width: i32, height: i32, data: &'a [i32], max: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            data,
            max: if max <= 0 { 1 } else { max },
            median: 0,
        }
    }

    /// Value drawn on the middle row (default 0)
    #[must_use]
    pub const fn median(mut self, median: i32) -> Self {
        self.median = median;
        self
    }

    /// Samples
    pub const fn data(&self) -> &'a [i32] {
        self.data
    }

    /// Row of `value`, clamped to the plot area
    fn row(&self, value: i32) -> i32 {
        let half = i64::from(self.height / 2);
        let delta = i64::from(value) - i64::from(self.median);
        let offset = half - delta * half / i64::from(self.max);
        let offset = offset.clamp(0, i64::from((self.height - 1).max(0))) as i32;
        self.y.saturating_add(offset)
    }

    /// Column of sample `index`
    fn column(&self, index: usize) -> i32 {
        let len = self.data.len().max(1) as i64;
        let offset = index as i64 * i64::from(self.width) / len;
        self.x.saturating_add(offset as i32)
    }

    fn is_drawable(&self) -> bool {
        !self.data.is_empty() && self.width > 0 && self.height > 0
    }
}

/// Plot rendering style
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlotKind {
    /// Connected line through the samples
    #[default]
    Pulse,
    /// One-pixel bar per sample from the median row
    BitBar,
    /// Isolated points over a baseline at the median row
    Scatter,
    /// Bars from the median row, as wide as the sample spacing
    Histogram,
}

impl FrameBuffer {
    /// Render `plot` in the given style
    pub fn plot(&mut self, kind: PlotKind, plot: &Plot<'_>) {
        match kind {
            PlotKind::Pulse => self.pulse_plot(plot),
            PlotKind::BitBar => self.bit_bar_plot(plot),
            PlotKind::Scatter => self.scatter_plot(plot),
            PlotKind::Histogram => self.histogram_plot(plot),
        }
    }

    /// Connect consecutive samples with line segments
    pub fn pulse_plot(&mut self, plot: &Plot<'_>) {
        if !plot.is_drawable() {
            return;
        }
        let mut previous = (plot.column(0), plot.row(plot.data[0]));
        if plot.data.len() == 1 {
            self.draw_pixel(previous.0, previous.1);
        }
        for (index, &value) in plot.data.iter().enumerate().skip(1) {
            let point = (plot.column(index), plot.row(value));
            self.line(previous.0, previous.1, point.0, point.1, 1);
            previous = point;
        }
    }

    /// Draw a vertical bar per sample between the median row and the sample
    pub fn bit_bar_plot(&mut self, plot: &Plot<'_>) {
        if !plot.is_drawable() {
            return;
        }
        let baseline = plot.row(plot.median);
        for (index, &value) in plot.data.iter().enumerate() {
            let row = plot.row(value);
            let top = row.min(baseline);
            self.vline(plot.column(index), top, (row - baseline).abs() + 1);
        }
    }

    /// Plot each sample as a point, with a baseline across the median row
    pub fn scatter_plot(&mut self, plot: &Plot<'_>) {
        if !plot.is_drawable() {
            return;
        }
        self.hline(plot.x, plot.row(plot.median), plot.width);
        for (index, &value) in plot.data.iter().enumerate() {
            self.draw_pixel(plot.column(index), plot.row(value));
        }
    }

    /// Draw one bar per sample between the median row and the sample
    ///
    /// Bars are `width / len` pixels wide (at least one).
    pub fn histogram_plot(&mut self, plot: &Plot<'_>) {
        if !plot.is_drawable() {
            return;
        }
        let len = i32::try_from(plot.data.len()).unwrap_or(i32::MAX);
        let bar_width = (plot.width / len).max(1);
        let baseline = plot.row(plot.median);
        let edge = plot.x.saturating_add(plot.width);
        for (index, &value) in plot.data.iter().enumerate() {
            let row = plot.row(value);
            let left = plot.column(index);
            let right = left.saturating_add(bar_width).min(edge);
            self.fill_rect(left, row.min(baseline), right - left, (row - baseline).abs() + 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Dimensions;

    fn buffer() -> FrameBuffer {
        FrameBuffer::new(Dimensions::new(128, 64).unwrap())
    }

    #[test]
    fn test_flat_pulse_sits_on_middle_row() {
        let mut frame = buffer();
        let data = [0; 8];
        frame.plot(PlotKind::Pulse, &Plot::new(0, 0, 64, 32, &data, 10));
        for x in 0..=56 {
            assert!(frame.pixel(x, 16));
        }
        assert!(!frame.pixel(0, 15));
        assert!(!frame.pixel(0, 17));
    }

    #[test]
    fn test_values_past_max_are_clamped_to_area() {
        let mut frame = buffer();
        let data = [1000, -1000];
        frame.plot(PlotKind::Scatter, &Plot::new(10, 10, 20, 20, &data, 10));
        assert!(frame.pixel(10, 10));
        assert!(frame.pixel(20, 29));
        for x in 0..128 {
            for y in 0..64 {
                if frame.pixel(x, y) {
                    assert!((10..30).contains(&x) && (10..30).contains(&y));
                }
            }
        }
    }

    #[test]
    fn test_scatter_draws_baseline_at_median() {
        let mut frame = buffer();
        let data = [50];
        let plot = Plot::new(0, 0, 40, 20, &data, 100).median(50);
        frame.scatter_plot(&plot);
        assert!((0..40).all(|x| frame.pixel(x, 10)));
        assert!(!frame.pixel(40, 10));
    }

    #[test]
    fn test_bit_bar_spans_median_to_value() {
        let mut frame = buffer();
        let data = [10, -10];
        frame.bit_bar_plot(&Plot::new(0, 0, 10, 20, &data, 10));
        // first bar from row 0 to the middle, second from the middle to the bottom
        assert!((0..=10).all(|y| frame.pixel(0, y)));
        assert!((10..20).all(|y| frame.pixel(5, y)));
        assert!(!frame.pixel(5, 9));
    }

    #[test]
    fn test_histogram_bar_spans_median_to_value() {
        let mut frame = buffer();
        let data = [10];
        frame.histogram_plot(&Plot::new(0, 0, 40, 40, &data, 20));
        // row(10) = 20 - 10 * 20 / 20 = 10, baseline at row 20
        assert!((10..=20).all(|y| frame.pixel(0, y) && frame.pixel(39, y)));
        assert!(!frame.pixel(0, 9));
        assert!(!frame.pixel(0, 21));
        assert!(!frame.pixel(0, 39));
    }

    #[test]
    fn test_histogram_bar_widths_and_directions() {
        let mut frame = buffer();
        let data = [10, 5, 0, -10];
        frame.histogram_plot(&Plot::new(0, 0, 40, 20, &data, 10));
        // full-scale bar from the top to the middle row, 10 px wide
        assert!(frame.pixel(0, 0) && frame.pixel(9, 10));
        assert!(!frame.pixel(9, 11));
        // half-scale bar
        assert!(frame.pixel(10, 5) && !frame.pixel(10, 4));
        // zero sample is a single row on the baseline
        assert!(frame.pixel(20, 10) && !frame.pixel(20, 9) && !frame.pixel(20, 11));
        // negative sample hangs below the baseline
        assert!(frame.pixel(30, 10) && frame.pixel(39, 19));
        assert!(!frame.pixel(30, 9));
    }

    #[test]
    fn test_narrow_histogram_keeps_one_pixel_bars() {
        let mut frame = buffer();
        let data = [10; 40];
        frame.histogram_plot(&Plot::new(0, 0, 20, 10, &data, 10));
        assert!((0..20).all(|x| frame.pixel(x, 0)));
        assert!(!frame.pixel(20, 0));
    }

    #[test]
    fn test_zero_max_and_empty_data_are_safe() {
        let mut frame = buffer();
        frame.plot(PlotKind::Pulse, &Plot::new(0, 0, 64, 32, &[], 0));
        frame.plot(PlotKind::Histogram, &Plot::new(0, 0, 64, 32, &[5], 0));
        assert!(frame.pixel(0, 0) && frame.pixel(0, 16));
    }

    #[test]
    fn test_extreme_samples_stay_in_area() {
        let big = i32::MAX / 2;
        let data = [big, -big, i32::MAX, i32::MIN];
        for kind in [PlotKind::Pulse, PlotKind::BitBar, PlotKind::Scatter, PlotKind::Histogram] {
            let mut frame = buffer();
            frame.plot(kind, &Plot::new(0, 0, 64, 64, &data, big));
            frame.plot(kind, &Plot::new(0, 0, 64, 64, &data, 1).median(i32::MIN));
            for y in 0..64 {
                for x in 64..128 {
                    assert!(!frame.pixel(x, y), "{kind:?} drew ({x}, {y})");
                }
            }
        }

        let mut frame = buffer();
        frame.histogram_plot(&Plot::new(0, 0, 64, 64, &[100_000_000], 100_000_000));
        assert!((0..=32).all(|y| frame.pixel(0, y)));
    }

    #[test]
    fn test_extreme_plot_origin_is_clipped() {
        let mut frame = buffer();
        let data = [1, -1, 1];
        frame.plot(PlotKind::Histogram, &Plot::new(i32::MAX - 5, i32::MAX - 5, i32::MAX, 64, &data, 1));
        frame.plot(PlotKind::Pulse, &Plot::new(i32::MAX - 5, 0, 10, 64, &data, 1));
        frame.plot(PlotKind::BitBar, &Plot::new(i32::MIN, i32::MIN, 10, 64, &data, 1));
        assert!(frame.as_bytes().iter().all(|b| *b == 0));
    }
}
