/// Growable FIFO of audio samples with an offset-based front.
///
/// `advance` moves a read offset instead of shifting the backing storage, so
/// a long-running streaming session does not reallocate per slide; the dead
/// prefix is compacted once it outgrows the live region.
#[derive(Clone, Debug, Default)]
pub struct SampleBuffer {
    data: Vec<f32>,
    start: usize,
}

impl SampleBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.data.len() - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn extend(&mut self, samples: &[f32]) {
        self.data.extend_from_slice(samples);
    }

    /// The first `n` buffered samples, or `None` if fewer are buffered.
    pub fn window(&self, n: usize) -> Option<&[f32]> {
        if self.len() < n {
            return None;
        }
        Some(&self.data[self.start..self.start + n])
    }

    /// Drops the first `n` buffered samples (all of them if fewer remain).
    pub fn advance(&mut self, n: usize) {
        self.start = (self.start + n).min(self.data.len());
        if self.start > self.data.len() / 2 {
            self.data.drain(..self.start);
            self.start = 0;
        }
    }

    pub fn clear(&mut self) {
        self.data.clear();
        self.start = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fifo_window_and_advance() {
        let mut buf = SampleBuffer::new();
        assert!(buf.is_empty());
        buf.extend(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(buf.len(), 5);

        assert_eq!(buf.window(3), Some(&[1.0f32, 2.0, 3.0][..]));
        assert!(buf.window(6).is_none());

        buf.advance(2);
        assert_eq!(buf.len(), 3);
        assert_eq!(buf.window(3), Some(&[3.0f32, 4.0, 5.0][..]));
    }

    #[test]
    fn advance_past_end_empties_buffer() {
        let mut buf = SampleBuffer::new();
        buf.extend(&[1.0, 2.0]);
        buf.advance(10);
        assert!(buf.is_empty());
        buf.extend(&[3.0]);
        assert_eq!(buf.window(1), Some(&[3.0f32][..]));
    }

    #[test]
    fn compaction_keeps_contents_stable() {
        let mut buf = SampleBuffer::new();
        let chunk: Vec<f32> = (0..100).map(|i| i as f32).collect();
        buf.extend(&chunk);
        for step in 0..9 {
            buf.advance(10);
            let expected = (step + 1) * 10;
            assert_eq!(buf.len(), 100 - expected);
            assert_eq!(buf.window(1), Some(&[expected as f32][..]));
        }
    }

    #[test]
    fn clear_is_idempotent() {
        let mut buf = SampleBuffer::new();
        buf.extend(&[1.0, 2.0, 3.0]);
        buf.clear();
        assert!(buf.is_empty());
        buf.clear();
        assert!(buf.is_empty());
    }
}
