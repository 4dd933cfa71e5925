use futures::{future::BoxFuture, FutureExt};

use super::StepContext;
use crate::pacing::Cancelled;

pub(super) async fn sort(ctx: &StepContext) -> Result<(), Cancelled> {
    sort_range(ctx, 0, ctx.len()).await
}

/// Top-down merge sort over `start..end`; the left half takes the extra
/// element of an odd range.
fn sort_range(
    ctx: &StepContext,
    start: usize,
    end: usize,
) -> BoxFuture<'_, Result<(), Cancelled>> {
    async move {
        if end - start < 2 {
            return Ok(());
        }
        ctx.checkpoint()?;
        let mid = start + (end - start + 1) / 2;
        sort_range(ctx, start, mid).await?;
        sort_range(ctx, mid, end).await?;
        merge(ctx, start, mid, end).await
    }
    .boxed()
}

async fn merge(ctx: &StepContext, start: usize, mid: usize, end: usize) -> Result<(), Cancelled> {
    let (left, right) = {
        let store = ctx.sequence().lock();
        let values = store.as_slice();
        (values[start..mid].to_vec(), values[mid..end].to_vec())
    };
    let mut cursor = MergeCursor {
        left,
        right,
        next_left: 0,
        next_right: 0,
        write_at: start,
    };

    let outcome = cursor.drain(ctx).await;
    if outcome.is_err() {
        cursor.restore(ctx);
    }
    outcome
}

/// In-flight state of one merge: the two copied halves and how far each has
/// been written back.
struct MergeCursor {
    left: Vec<u32>,
    right: Vec<u32>,
    next_left: usize,
    next_right: usize,
    write_at: usize,
}

impl MergeCursor {
    async fn drain(&mut self, ctx: &StepContext) -> Result<(), Cancelled> {
        loop {
            ctx.checkpoint()?;
            let Some(value) = self.take_next() else {
                return Ok(());
            };
            ctx.write(self.write_at, value);
            self.write_at += 1;
            ctx.await_step().await?;
            ctx.clear(&[self.write_at - 1]);
        }
    }

    /// Next value in merged order; ties go to the left half.
    fn take_next(&mut self) -> Option<u32> {
        let left = self.left.get(self.next_left).copied();
        let right = self.right.get(self.next_right).copied();
        match (left, right) {
            (Some(l), Some(r)) if l <= r => {
                self.next_left += 1;
                Some(l)
            }
            (Some(_), Some(r)) => {
                self.next_right += 1;
                Some(r)
            }
            (Some(l), None) => {
                self.next_left += 1;
                Some(l)
            }
            (None, Some(r)) => {
                self.next_right += 1;
                Some(r)
            }
            (None, None) => None,
        }
    }

    /// Writes every value not yet merged back into the unwritten tail.
    fn restore(&self, ctx: &StepContext) {
        let remaining: Vec<u32> = self.left[self.next_left..]
            .iter()
            .chain(&self.right[self.next_right..])
            .copied()
            .collect();
        ctx.restore(self.write_at, &remaining);
    }
}
