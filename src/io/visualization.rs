//! Frame capture and GIF generation for watching a generation unfold

use std::path::Path;

use crate::io::configuration::VIEWER_MIN_FRAME_DELAY_MS;
use crate::io::error::{Result, WfcError};
use crate::io::image::{ensure_parent_dir, pixel_grid_to_image};
use crate::spatial::pixels::PixelGrid;
use image::Frame;

/// Captures intermediate renders at a fixed iteration interval
///
/// Frames are stored as rendered grids and only encoded on export.
pub struct FrameCapture {
    frames: Vec<PixelGrid>,
    interval: usize,
}

impl FrameCapture {
    /// Capture one frame every `interval` iterations (at least one)
    pub fn new(interval: usize) -> Self {
        Self {
            frames: Vec::new(),
            interval: interval.max(1),
        }
    }

    /// Whether a frame should be taken at this iteration
    pub const fn should_capture(&self, iteration: usize) -> bool {
        iteration % self.interval == 0
    }

    /// Store a rendered frame
    pub fn record(&mut self, frame: PixelGrid) {
        self.frames.push(frame);
    }

    /// Store the frame for an iteration if it falls on the interval
    pub fn record_at(&mut self, iteration: usize, render: impl FnOnce() -> PixelGrid) {
        if self.should_capture(iteration) {
            self.record(render());
        }
    }

    /// Number of frames captured
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Drop every captured frame
    pub fn clear(&mut self) {
        self.frames.clear();
    }

    /// Export the captured frames as a GIF with automatic frame skipping
    ///
    /// If the requested delay is below what viewers reliably display, frames are
    /// skipped so the apparent animation speed is kept. The last frame is held
    /// longer.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No frames were captured
    /// - File system operations fail
    /// - GIF encoding fails
    pub fn export_gif(&self, output_path: &Path, frame_delay_ms: u32) -> Result<()> {
        if self.frames.is_empty() {
            return Err(WfcError::InvalidSourceData {
                reason: "No frames captured for visualization".to_string(),
            });
        }

        let frames = self.encode_frames(frame_delay_ms);

        ensure_parent_dir(output_path)?;

        let file = std::fs::File::create(output_path).map_err(|e| WfcError::FileSystem {
            path: output_path.to_path_buf(),
            operation: "create file",
            source: e,
        })?;

        let mut encoder = image::codecs::gif::GifEncoder::new(file);
        encoder
            .encode_frames(frames)
            .map_err(|e| WfcError::ImageExport {
                path: output_path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    /// Indices of the frames kept for a requested delay, and the delay to use
    pub fn frame_schedule(&self, frame_delay_ms: u32) -> (Vec<usize>, u32) {
        let effective_delay_ms = frame_delay_ms.max(VIEWER_MIN_FRAME_DELAY_MS);
        let skip_factor = if frame_delay_ms < VIEWER_MIN_FRAME_DELAY_MS {
            VIEWER_MIN_FRAME_DELAY_MS.div_ceil(frame_delay_ms.max(1)) as usize
        } else {
            1
        };

        let mut kept: Vec<usize> = (0..self.frames.len()).step_by(skip_factor).collect();
        // The final state is always shown
        if let Some(last) = self.frames.len().checked_sub(1) {
            if kept.last() != Some(&last) {
                kept.push(last);
            }
        }

        (kept, effective_delay_ms)
    }

    fn encode_frames(&self, frame_delay_ms: u32) -> Vec<Frame> {
        let (kept, delay_ms) = self.frame_schedule(frame_delay_ms);
        let mut frames: Vec<Frame> = kept
            .iter()
            .filter_map(|&index| self.frames.get(index))
            .map(|grid| {
                Frame::from_parts(
                    pixel_grid_to_image(grid),
                    0,
                    0,
                    image::Delay::from_numer_denom_ms(delay_ms, 1),
                )
            })
            .collect();

        // Final frame displays longer for better visibility
        if let Some(last_frame_img) = frames.last().map(|f| f.buffer().clone()) {
            frames.push(Frame::from_parts(
                last_frame_img,
                0,
                0,
                image::Delay::from_numer_denom_ms(delay_ms * 25, 1),
            ));
        }

        frames
    }
}
