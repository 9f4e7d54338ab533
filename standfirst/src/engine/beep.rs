//! One-shot cue for a seat standing up.

/// Latch raised by a sensor-driven seated -> standing commit and cleared when
/// the caller takes it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BeepLatch {
    set: bool,
}

impl BeepLatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&mut self) {
        self.set = true;
    }

    pub fn is_set(&self) -> bool {
        self.set
    }

    /// Return the latch value and clear it.
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.set)
    }

    pub fn clear(&mut self) {
        self.set = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_clears() {
        let mut latch = BeepLatch::new();
        assert!(!latch.take());

        latch.raise();
        latch.raise();
        assert!(latch.is_set());
        assert!(latch.take());
        assert!(!latch.take());
    }
}
