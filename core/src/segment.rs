use crate::error::{DemodError, Result};

/// Never analyse fewer samples than this, whatever the configured ratio
pub const MIN_ANALYSIS_SAMPLES: usize = 16;

/// Slices a filtered recording into fixed-length analysis windows
#[derive(Debug, Clone, Copy)]
pub struct Segmenter {
    window_len: usize,
    min_len: usize,
}

impl Segmenter {
    /// `min_window_ratio` sets the shortest trailing window kept, as a
    /// fraction of `window_len`
    pub fn new(window_len: usize, min_window_ratio: f64) -> Result<Self> {
        if window_len < MIN_ANALYSIS_SAMPLES {
            return Err(DemodError::InvalidConfig(format!(
                "window of {} samples is shorter than the {} sample minimum",
                window_len, MIN_ANALYSIS_SAMPLES
            )));
        }
        let min_len = ((window_len as f64 * min_window_ratio).ceil() as usize)
            .clamp(MIN_ANALYSIS_SAMPLES, window_len);
        Ok(Self {
            window_len,
            min_len,
        })
    }

    pub fn window_len(&self) -> usize {
        self.window_len
    }

    pub fn min_len(&self) -> usize {
        self.min_len
    }

    /// # Errors
    /// `MalformedInput` when `len` samples cannot fill even one minimal window
    pub fn ensure_viable(&self, len: usize) -> Result<()> {
        if len < self.min_len {
            return Err(DemodError::MalformedInput {
                samples: len,
                min_window: self.min_len,
            });
        }
        Ok(())
    }

    /// Split `samples` into windows; a short trailing window is dropped
    ///
    /// # Errors
    /// `MalformedInput`, see [`Segmenter::ensure_viable`]
    pub fn split<'a>(&self, samples: &'a [f32]) -> Result<Vec<&'a [f32]>> {
        self.ensure_viable(samples.len())?;

        let mut windows: Vec<&[f32]> = samples.chunks(self.window_len).collect();
        if windows.last().is_some_and(|last| last.len() < self.min_len) {
            windows.pop();
        }
        Ok(windows)
    }
}
