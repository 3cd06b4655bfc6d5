//! Tests for frame capture and GIF export

#[cfg(test)]
mod tests {
    use tempfile::TempDir;
    use wavecollapse::io::configuration::VIEWER_MIN_FRAME_DELAY_MS;
    use wavecollapse::io::visualization::FrameCapture;
    use wavecollapse::spatial::PixelGrid;

    fn capture_with(frames: usize) -> FrameCapture {
        let mut capture = FrameCapture::new(1);
        for shade in 0..frames {
            capture.record(PixelGrid::filled(2, 2, [shade as u8, 0, 0, 255]));
        }
        capture
    }

    // Tests frames are only taken on the capture interval
    // Verified by capturing on every iteration
    #[test]
    fn test_capture_interval() {
        let mut capture = FrameCapture::new(3);
        for iteration in 0..7 {
            capture.record_at(iteration, || PixelGrid::new(1, 1));
        }
        assert_eq!(capture.frame_count(), 3);

        capture.clear();
        assert_eq!(capture.frame_count(), 0);
    }

    // Tests an interval of zero is treated as one
    // Verified by removing the minimum of one
    #[test]
    fn test_zero_interval() {
        let capture = FrameCapture::new(0);
        assert!(capture.should_capture(5));
    }

    // Tests fast delays skip frames while keeping the last one
    // Verified by dropping the final frame when it is off the stride
    #[test]
    fn test_frame_schedule_skips() {
        let capture = capture_with(10);
        let (kept, delay) = capture.frame_schedule(VIEWER_MIN_FRAME_DELAY_MS / 2);
        assert_eq!(delay, VIEWER_MIN_FRAME_DELAY_MS);
        assert_eq!(kept, vec![0, 2, 4, 6, 8, 9]);
    }

    // Tests slow delays keep every frame
    // Verified by always applying the skip factor
    #[test]
    fn test_frame_schedule_keeps_all() {
        let capture = capture_with(3);
        let (kept, delay) = capture.frame_schedule(VIEWER_MIN_FRAME_DELAY_MS * 2);
        assert_eq!(delay, VIEWER_MIN_FRAME_DELAY_MS * 2);
        assert_eq!(kept, vec![0, 1, 2]);
    }

    // Tests GIF export writes a file and refuses empty captures
    // Verified by skipping the encoder call
    #[test]
    fn test_export_gif() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("run.gif");

        assert!(FrameCapture::new(1).export_gif(&path, 20).is_err());

        capture_with(4).export_gif(&path, 20).expect("Failed to export GIF");
        let metadata = std::fs::metadata(&path).expect("GIF missing");
        assert!(metadata.len() > 0);
    }
}
