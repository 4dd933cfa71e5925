use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rand::Rng;
use shared::domain::{VALUE_MAX, VALUE_MIN};

/// The array being sorted. Indices are never derived from user input, so an
/// out-of-range index panics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SequenceStore {
    values: Vec<u32>,
}

impl SequenceStore {
    pub fn from_values(values: Vec<u32>) -> Self {
        Self { values }
    }

    /// Draws `len` values uniformly from `VALUE_MIN..=VALUE_MAX`.
    pub fn generate<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Self {
        let values = (0..len)
            .map(|_| rng.gen_range(VALUE_MIN..=VALUE_MAX))
            .collect();
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> u32 {
        self.values[index]
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.values
    }

    pub fn swap(&mut self, i: usize, j: usize) {
        self.values.swap(i, j);
    }

    pub fn set(&mut self, index: usize, value: u32) {
        self.values[index] = value;
    }

    pub fn is_sorted(&self) -> bool {
        self.values.windows(2).all(|pair| pair[0] <= pair[1])
    }
}

/// Shared handle to one sequence. The active run is its only writer; readers
/// take snapshots.
#[derive(Debug, Clone, Default)]
pub struct SequenceHandle {
    inner: Arc<Mutex<SequenceStore>>,
}

impl SequenceHandle {
    pub fn new(store: SequenceStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    pub fn lock(&self) -> MutexGuard<'_, SequenceStore> {
        // A panic while holding the lock leaves the values intact; keep going.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn snapshot(&self) -> Vec<u32> {
        self.lock().as_slice().to_vec()
    }
}
