//! In-memory pixel store
//!
//! The frame buffer mirrors the controller's display RAM: one bit per pixel,
//! organized in 8-row pages. Byte `page * width + x` holds the column `x` of
//! that page, with bit 0 as the top row.
//!
//! ```text
//!          x=0      x=1      x=2
//! page 0  [b0..b7] [b0..b7] [b0..b7] ...   rows 0-7
//! page 1  [b0..b7] [b0..b7] [b0..b7] ...   rows 8-15
//! ```
//!
//! Every drawing operation is a pure memory operation. Coordinates are signed
//! so shapes may extend past the edges; pixels outside the panel are dropped.

use crate::config::{Dimensions, MAX_HEIGHT, MAX_WIDTH};
use crate::error::BuilderError;

/// Storage for the largest supported panel
pub const BUFFER_CAPACITY: usize = MAX_WIDTH as usize * MAX_HEIGHT as usize / 8;

/// Monochrome bitmap borrowed from the caller
///
/// Row-major, most significant bit first, each row padded to a whole byte.
///
/// ```rust
/// use ssd1306_pio::Bitmap;
///
/// // 10x2 arrow head: two bytes per row
/// const ARROW: [u8; 4] = [0b1100_0000, 0b0000_0000, 0b1111_1111, 0b1100_0000];
/// let bitmap = Bitmap::new(&ARROW, 10, 2);
/// assert!(bitmap.is_ok());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bitmap<'a> {
    data: &'a [u8],
    width: u16,
    height: u16,
}

impl<'a> Bitmap<'a> {
    /// Wrap bitmap bytes
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::BitmapTooSmall` if `data` is shorter than
    /// `height * ceil(width / 8)` bytes.
    pub const fn new(data: &'a [u8], width: u16, height: u16) -> Result<Self, BuilderError> {
        let required = Self::stride_for(width) * height as usize;
        if data.len() < required {
            return Err(BuilderError::BitmapTooSmall {
                required,
                provided: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    const fn stride_for(width: u16) -> usize {
        (width as usize).div_ceil(8)
    }

    /// Width in pixels
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Height in pixels
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Bytes per row
    pub const fn stride(&self) -> usize {
        Self::stride_for(self.width)
    }

    /// Whether the bitmap pixel at (x, y) is set
    pub fn is_set(&self, x: u16, y: u16) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let index = y as usize * self.stride() + x as usize / 8;
        self.data
            .get(index)
            .is_some_and(|byte| byte & (0x80 >> (x % 8)) != 0)
    }
}

/// Page-organized monochrome frame buffer
#[derive(Clone, Debug)]
pub struct FrameBuffer {
    bytes: [u8; BUFFER_CAPACITY],
    dimensions: Dimensions,
    /// Pen state: drawing clears pixels instead of setting them
    inverted: bool,
}

impl FrameBuffer {
    /// Create a blank buffer for the given panel
    pub const fn new(dimensions: Dimensions) -> Self {
        Self {
            bytes: [0; BUFFER_CAPACITY],
            dimensions,
            inverted: false,
        }
    }

    /// Panel dimensions
    pub const fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// Width in pixels
    pub const fn width(&self) -> i32 {
        self.dimensions.width as i32
    }

    /// Height in pixels
    pub const fn height(&self) -> i32 {
        self.dimensions.height as i32
    }

    /// Number of 8-row pages
    pub const fn pages(&self) -> u8 {
        self.dimensions.pages()
    }

    /// Live buffer contents in display RAM order
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.dimensions.buffer_size()]
    }

    /// Columns `start..=end` of one page
    ///
    /// Returns an empty slice for an out-of-range page or an empty span.
    pub fn page_span(&self, page: u8, start: u8, end: u8) -> &[u8] {
        let width = usize::from(self.dimensions.width);
        let end = usize::from(end).min(width.saturating_sub(1));
        let start = usize::from(start);
        if page >= self.pages() || start > end {
            return &[];
        }
        let base = usize::from(page) * width;
        &self.bytes[base + start..=base + end]
    }

    /// Reset every pixel to off
    pub fn clear(&mut self) {
        self.bytes.fill(0);
    }

    /// Select the pen: `true` makes drawing operations clear pixels
    pub const fn set_inverted(&mut self, inverted: bool) {
        self.inverted = inverted;
    }

    /// Whether drawing operations currently clear pixels
    pub const fn is_inverted(&self) -> bool {
        self.inverted
    }

    fn locate(&self, x: i32, y: i32) -> Option<(usize, u8)> {
        if x < 0 || y < 0 || x >= self.width() || y >= self.height() {
            return None;
        }
        let index = (y as usize / 8) * usize::from(self.dimensions.width) + x as usize;
        Some((index, 1 << (y % 8)))
    }

    /// Set one pixel to the given state, ignoring the pen
    ///
    /// Out-of-range coordinates are ignored.
    pub fn set_pixel(&mut self, x: i32, y: i32, on: bool) {
        if let Some((index, mask)) = self.locate(x, y) {
            if on {
                self.bytes[index] |= mask;
            } else {
                self.bytes[index] &= !mask;
            }
        }
    }

    /// Draw one pixel with the current pen
    pub fn draw_pixel(&mut self, x: i32, y: i32) {
        self.set_pixel(x, y, !self.inverted);
    }

    /// Turn one pixel off
    pub fn clear_pixel(&mut self, x: i32, y: i32) {
        self.set_pixel(x, y, false);
    }

    /// Whether the pixel at (x, y) is on; `false` outside the panel
    pub fn pixel(&self, x: i32, y: i32) -> bool {
        self.locate(x, y)
            .is_some_and(|(index, mask)| self.bytes[index] & mask != 0)
    }

    /// Clear columns `start_x..=end_x` of one page
    ///
    /// Columns past the right edge are ignored, as is a page past the bottom.
    pub fn clear_area(&mut self, start_x: u8, end_x: u8, page: u8) {
        let width = usize::from(self.dimensions.width);
        if page >= self.pages() || start_x > end_x || usize::from(start_x) >= width {
            return;
        }
        let end = usize::from(end_x).min(width - 1);
        let base = usize::from(page) * width;
        self.bytes[base + usize::from(start_x)..=base + end].fill(0);
    }

    /// Fill a rectangle with the current pen, clipped to the panel
    pub fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = x.saturating_add(width).min(self.width());
        let y1 = y.saturating_add(height).min(self.height());
        for row in y0..y1 {
            for column in x0..x1 {
                self.draw_pixel(column, row);
            }
        }
    }

    /// Horizontal run of `length` pixels starting at (x, y)
    pub fn hline(&mut self, x: i32, y: i32, length: i32) {
        self.fill_rect(x, y, length, 1);
    }

    /// Vertical run of `length` pixels starting at (x, y)
    pub fn vline(&mut self, x: i32, y: i32, length: i32) {
        self.fill_rect(x, y, 1, length);
    }

    /// Copy a bitmap with its top-left corner at (x, y)
    ///
    /// Set bitmap pixels are drawn with the pen; unset pixels leave the
    /// buffer untouched. The part outside the panel is clipped.
    pub fn draw_bitmap(&mut self, bitmap: &Bitmap<'_>, x: i32, y: i32) {
        for row in 0..bitmap.height() {
            let target_y = y.saturating_add(i32::from(row));
            if target_y >= self.height() {
                break;
            }
            for column in 0..bitmap.width() {
                if bitmap.is_set(column, row) {
                    self.draw_pixel(x.saturating_add(i32::from(column)), target_y);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn buffer() -> FrameBuffer {
        FrameBuffer::new(Dimensions::new(128, 64).unwrap())
    }

    #[test]
    fn test_pixel_maps_to_page_byte() {
        let mut frame = buffer();
        frame.draw_pixel(5, 10);
        // page 1, column 5, bit 2
        assert_eq!(frame.as_bytes()[128 + 5], 0b0000_0100);
        assert_eq!(frame.as_bytes().iter().filter(|b| **b != 0).count(), 1);
    }

    #[test]
    fn test_buffer_length_follows_dimensions() {
        let frame = FrameBuffer::new(Dimensions::new(128, 32).unwrap());
        assert_eq!(frame.as_bytes().len(), 512);
        assert_eq!(buffer().as_bytes().len(), 1024);
    }

    #[test]
    fn test_out_of_range_is_ignored() {
        let mut frame = buffer();
        frame.draw_pixel(128, 0);
        frame.draw_pixel(0, 64);
        frame.draw_pixel(-1, 3);
        assert!(frame.as_bytes().iter().all(|b| *b == 0));
        assert!(!frame.pixel(-1, 3));
    }

    #[test]
    fn test_inverted_pen_clears() {
        let mut frame = buffer();
        frame.fill_rect(0, 0, 8, 8);
        frame.set_inverted(true);
        frame.draw_pixel(3, 3);
        assert!(!frame.pixel(3, 3));
        assert!(frame.pixel(2, 3));
    }

    #[test]
    fn test_clear_area_limits_to_page_and_columns() {
        let mut frame = buffer();
        frame.fill_rect(0, 0, 128, 64);
        frame.clear_area(10, 19, 2);

        assert!(!frame.pixel(10, 16));
        assert!(!frame.pixel(19, 23));
        assert!(frame.pixel(9, 16));
        assert!(frame.pixel(20, 16));
        assert!(frame.pixel(15, 15));
        assert!(frame.pixel(15, 24));
    }

    #[test]
    fn test_clear_area_out_of_range_is_ignored() {
        let mut frame = buffer();
        frame.fill_rect(0, 0, 128, 64);
        frame.clear_area(0, 10, 8);
        frame.clear_area(200, 210, 0);
        assert!(frame.as_bytes().iter().all(|b| *b == 0xFF));
    }

    #[test]
    fn test_bitmap_rejects_short_data() {
        assert_eq!(
            Bitmap::new(&[0xFF; 3], 10, 2),
            Err(BuilderError::BitmapTooSmall {
                required: 4,
                provided: 3
            })
        );
    }

    #[test]
    fn test_draw_bitmap_msb_first_rows() {
        let mut frame = buffer();
        let data = [0b1000_0001, 0b1000_0000, 0b0100_0000, 0b0000_0000];
        let bitmap = Bitmap::new(&data, 9, 2).unwrap();
        frame.draw_bitmap(&bitmap, 10, 20);

        assert!(frame.pixel(10, 20));
        assert!(frame.pixel(17, 20));
        assert!(frame.pixel(18, 20));
        assert!(frame.pixel(11, 21));
        assert!(!frame.pixel(12, 21));
        assert!(!frame.pixel(18, 21));
    }

    #[test]
    fn test_draw_bitmap_clips_at_edges() {
        let mut frame = buffer();
        let data = [0xFF; 8];
        let bitmap = Bitmap::new(&data, 8, 8).unwrap();
        frame.draw_bitmap(&bitmap, 124, 60);
        frame.draw_bitmap(&bitmap, -4, -4);

        assert!(frame.pixel(127, 63));
        assert!(frame.pixel(0, 0));
        assert!(frame.pixel(3, 3));
        assert!(!frame.pixel(4, 4));
    }

    /// Every panel pixel matches the bitmap inside its footprint and is dark outside
    fn assert_blit_matches(frame: &FrameBuffer, bitmap: &Bitmap<'_>, x: i32, y: i32) {
        let (w, h) = (i32::from(bitmap.width()), i32::from(bitmap.height()));
        for py in 0..frame.height() {
            for px in 0..frame.width() {
                let (bx, by) = (px - x, py - y);
                let expected = (0..w).contains(&bx)
                    && (0..h).contains(&by)
                    && bitmap.is_set(bx as u16, by as u16);
                assert_eq!(frame.pixel(px, py), expected, "pixel ({px}, {py})");
            }
        }
    }

    #[test]
    fn test_draw_bitmap_reads_back_every_bit() {
        let data: [u8; 22] = core::array::from_fn(|i| (i as u8).wrapping_mul(0x9D) ^ 0x5A);
        let bitmap = Bitmap::new(&data, 13, 11).unwrap();
        let mut frame = buffer();
        frame.draw_bitmap(&bitmap, 7, 5);
        assert_blit_matches(&frame, &bitmap, 7, 5);
    }

    #[test]
    fn test_draw_bitmap_at_coordinate_limits() {
        let data = [0xFF; 8];
        let bitmap = Bitmap::new(&data, 8, 8).unwrap();
        let mut frame = buffer();
        frame.draw_bitmap(&bitmap, i32::MAX - 2, 0);
        frame.draw_bitmap(&bitmap, 0, i32::MAX - 2);
        frame.draw_bitmap(&bitmap, i32::MIN, i32::MIN);
        assert!(frame.as_bytes().iter().all(|b| *b == 0));
    }

    #[test]
    fn test_page_span_clamps_end() {
        let mut frame = buffer();
        frame.fill_rect(120, 0, 8, 8);
        assert_eq!(frame.page_span(0, 120, 200), &[0xFF; 8]);
        assert!(frame.page_span(9, 0, 10).is_empty());
    }

    proptest! {
        #[test]
        fn prop_set_then_query(x in 0i32..128, y in 0i32..64) {
            let mut frame = buffer();
            frame.draw_pixel(x, y);
            prop_assert!(frame.pixel(x, y));
            frame.clear_pixel(x, y);
            prop_assert!(!frame.pixel(x, y));
        }

        #[test]
        fn prop_out_of_range_leaves_buffer(x in -500i32..500, y in -500i32..500) {
            prop_assume!(!(0..128).contains(&x) || !(0..64).contains(&y));
            let mut frame = buffer();
            frame.draw_pixel(x, y);
            prop_assert!(frame.as_bytes().iter().all(|b| *b == 0));
        }

        #[test]
        fn prop_bitmap_blit_reads_back(
            data in proptest::collection::vec(any::<u8>(), 48),
            x in -20i32..130,
            y in -20i32..70,
        ) {
            let bitmap = Bitmap::new(&data, 20, 16).unwrap();
            let mut frame = buffer();
            frame.draw_bitmap(&bitmap, x, y);
            assert_blit_matches(&frame, &bitmap, x, y);
        }

        #[test]
        fn prop_pixel_touches_single_bit(x in 0i32..128, y in 0i32..64) {
            let mut frame = buffer();
            frame.draw_pixel(x, y);
            let ones: u32 = frame.as_bytes().iter().map(|b| b.count_ones()).sum();
            prop_assert_eq!(ones, 1);
        }
    }
}
