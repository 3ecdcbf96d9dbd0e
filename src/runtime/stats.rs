//! Frame rate tracking over a rolling window of frame timestamps

/// Bounds on the number of timestamps kept for the estimate
pub const MIN_WINDOW: usize = 2;
pub const MAX_WINDOW: usize = 600;

#[derive(Debug, Clone)]
pub struct FrameStats {
    frame_times: Vec<f64>,
    frame_index: usize,
    fps: u32,
    frames: u64,
}

impl FrameStats {
    pub fn new(window: usize) -> Self {
        Self {
            frame_times: vec![0.0; window.clamp(MIN_WINDOW, MAX_WINDOW)],
            frame_index: 0,
            fps: 0,
            frames: 0,
        }
    }

    /// Record a frame at `time` (milliseconds)
    pub fn record(&mut self, time: f64) {
        let window = self.frame_times.len();
        self.frame_times[self.frame_index] = time;
        self.frame_index = (self.frame_index + 1) % window;
        self.frames += 1;

        // Oldest slot is the one about to be overwritten
        if self.frames as usize >= window {
            let oldest = self.frame_times[self.frame_index];
            let elapsed = time - oldest;
            if elapsed > 0.0 {
                self.fps = ((window - 1) as f64 * 1000.0 / elapsed).round() as u32;
            }
        }
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Frames recorded since the last reset
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn reset(&mut self) {
        self.frame_times.iter_mut().for_each(|t| *t = 0.0);
        self.frame_index = 0;
        self.fps = 0;
        self.frames = 0;
    }
}
