//! Progressive accumulation buffer.

use crate::config::Color;

/// Running per-pixel sums of tonemapped samples.
///
/// `frame_count` is the number of frames folded into the sums, so the
/// displayed value of a pixel is `sum / frame_count`.
#[derive(Debug, Clone, Default)]
pub struct Accumulator {
    data: Vec<Color>,
    frame_count: u32,
}

impl Accumulator {
    /// Create a zeroed buffer for `len` pixels.
    pub fn new(len: usize) -> Self {
        Self {
            data: vec![Color::ZERO; len],
            frame_count: 0,
        }
    }

    /// Zero every sum and restart the frame count.
    pub fn reset(&mut self) {
        self.data.fill(Color::ZERO);
        self.frame_count = 0;
    }

    /// Resize to `len` pixels and reset.
    ///
    /// Keeps the existing allocation when it is large enough.
    pub fn resize(&mut self, len: usize) {
        self.data.clear();
        self.data.resize(len, Color::ZERO);
        self.frame_count = 0;
    }

    /// Count the frame about to be added and return the new count.
    pub fn begin_frame(&mut self) -> u32 {
        self.frame_count = self.frame_count.saturating_add(1);
        self.frame_count
    }

    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    pub fn data(&self) -> &[Color] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [Color] {
        &mut self.data
    }

    /// Current average for pixel `index`, or black before the first frame.
    pub fn mean(&self, index: usize) -> Color {
        if self.frame_count == 0 {
            return Color::ZERO;
        }
        self.data[index] / self.frame_count as f32
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Add `sample` to a running sum and return the new average over `frame_count` frames.
#[inline]
pub fn accumulate(sum: &mut Color, sample: Color, frame_count: u32) -> Color {
    *sum += sample;
    *sum / frame_count.max(1) as f32
}
