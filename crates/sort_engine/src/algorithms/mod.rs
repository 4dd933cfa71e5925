//! The six animated sorting algorithms.
//!
//! Every algorithm drives a [`StepContext`]: reads and comparisons go through
//! it so they can be highlighted, `swap`/`write` are the only counted
//! mutations, and `await_step` is the only suspension point. Loops start
//! with `checkpoint()?` so a cancelled run unwinds before its next step.

use std::cmp::Ordering;

use shared::{
    domain::{AlgorithmId, Focus},
    protocol::StepKind,
};

use crate::{
    emitter::StepEmitter,
    pacing::{Cancelled, Pacer},
    sequence::SequenceHandle,
};

mod bubble;
mod heap;
mod insertion;
mod merge;
mod quick;
mod selection;

/// Runs `algorithm` over the context's sequence until it is sorted or the run
/// is cancelled.
pub async fn run(algorithm: AlgorithmId, ctx: &StepContext) -> Result<(), Cancelled> {
    ctx.checkpoint()?;
    if ctx.len() <= 1 {
        return Ok(());
    }
    match algorithm {
        AlgorithmId::BubbleSort => bubble::sort(ctx).await,
        AlgorithmId::InsertionSort => insertion::sort(ctx).await,
        AlgorithmId::SelectionSort => selection::sort(ctx).await,
        AlgorithmId::QuickSort => quick::sort(ctx).await,
        AlgorithmId::MergeSort => merge::sort(ctx).await,
        AlgorithmId::HeapSort => heap::sort(ctx).await,
    }
}

pub struct StepContext {
    sequence: SequenceHandle,
    emitter: StepEmitter,
    pacer: Pacer,
}

impl StepContext {
    pub fn new(sequence: SequenceHandle, emitter: StepEmitter, pacer: Pacer) -> Self {
        Self {
            sequence,
            emitter,
            pacer,
        }
    }

    pub fn sequence(&self) -> &SequenceHandle {
        &self.sequence
    }

    pub fn emitter(&self) -> &StepEmitter {
        &self.emitter
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    pub fn value(&self, index: usize) -> u32 {
        self.sequence.lock().get(index)
    }

    pub fn checkpoint(&self) -> Result<(), Cancelled> {
        self.pacer.checkpoint()
    }

    pub async fn await_step(&self) -> Result<(), Cancelled> {
        self.pacer.await_step().await
    }

    /// Compares the values at `i` and `j`, highlighting both.
    pub fn compare(&self, i: usize, j: usize, focus: Focus) -> Ordering {
        let (a, b) = {
            let store = self.sequence.lock();
            (store.get(i), store.get(j))
        };
        self.emitter
            .emit(StepKind::Compare, vec![i, j], vec![a, b], focus, false);
        a.cmp(&b)
    }

    /// Compares the value at `index` with a value held outside the sequence.
    pub fn compare_with(&self, index: usize, other: u32, focus: Focus) -> Ordering {
        let value = self.value(index);
        self.emitter
            .emit(StepKind::Compare, vec![index], vec![value], focus, false);
        value.cmp(&other)
    }

    pub fn highlight(&self, indices: &[usize], focus: Focus) {
        let values = {
            let store = self.sequence.lock();
            indices.iter().map(|&index| store.get(index)).collect()
        };
        self.emitter
            .emit(StepKind::Highlight, indices.to_vec(), values, focus, false);
    }

    pub fn clear(&self, indices: &[usize]) {
        self.highlight(indices, Focus::None);
    }

    /// Counted swap.
    pub fn swap(&self, i: usize, j: usize) {
        let values = {
            let mut store = self.sequence.lock();
            store.swap(i, j);
            vec![store.get(i), store.get(j)]
        };
        self.emitter
            .emit(StepKind::Swap, vec![i, j], values, Focus::Swapped, true);
    }

    /// Counted overwrite.
    pub fn write(&self, index: usize, value: u32) {
        self.set(index, value, true);
    }

    /// Overwrite that is shown but not counted.
    pub fn place(&self, index: usize, value: u32) {
        self.set(index, value, false);
    }

    fn set(&self, index: usize, value: u32, counted: bool) {
        self.sequence.lock().set(index, value);
        self.emitter.emit(
            StepKind::Overwrite,
            vec![index],
            vec![value],
            Focus::Swapped,
            counted,
        );
    }

    /// Puts values held outside the sequence back at `start..` after a
    /// cancellation, so the abandoned sequence stays a permutation of its
    /// input. Not a step: nothing is emitted or counted.
    pub(crate) fn restore(&self, start: usize, values: &[u32]) {
        let mut store = self.sequence.lock();
        for (offset, &value) in values.iter().enumerate() {
            store.set(start + offset, value);
        }
    }
}

#[cfg(test)]
#[path = "../tests/algorithms_tests.rs"]
mod tests;
