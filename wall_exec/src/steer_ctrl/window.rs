//! Fixed capacity window of recent values

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Ring buffer holding the most recent `capacity` values.
///
/// The buffer starts full of a seed value, so the mean is defined from the
/// first push and the seed only leaves once `capacity` values have been
/// pushed.
#[derive(Debug, Clone)]
pub struct RollingWindow {
    values: Vec<f64>,

    /// Index of the oldest value, the next to be overwritten.
    head: usize,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl RollingWindow {
    /// Create a window, a capacity of zero is treated as one.
    pub fn new(capacity: usize, seed: f64) -> Self {
        Self {
            values: vec![seed; capacity.max(1)],
            head: 0
        }
    }

    pub fn capacity(&self) -> usize {
        self.values.len()
    }

    /// Push a value, evicting the oldest.
    pub fn push(&mut self, value: f64) {
        self.values[self.head] = value;
        self.head = (self.head + 1) % self.values.len();
    }

    pub fn mean(&self) -> f64 {
        self.values.iter().sum::<f64>() / self.values.len() as f64
    }
}
