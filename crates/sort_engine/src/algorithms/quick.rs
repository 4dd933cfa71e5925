use std::{cmp::Ordering, ops::Range};

use shared::domain::Focus;

use super::StepContext;
use crate::pacing::Cancelled;

/// Lomuto quick sort. Pending ranges live on an explicit stack; the left
/// partition is pushed last so ranges are visited in recursive order.
pub(super) async fn sort(ctx: &StepContext) -> Result<(), Cancelled> {
    let mut pending: Vec<Range<usize>> = vec![0..ctx.len()];
    while let Some(range) = pending.pop() {
        ctx.checkpoint()?;
        if range.len() < 2 {
            continue;
        }
        let pivot = partition(ctx, range.clone()).await?;
        pending.push(pivot + 1..range.end);
        pending.push(range.start..pivot);
    }
    Ok(())
}

/// Partitions `range` around its last element and returns the pivot's final
/// index. The pivot stays in place until the end, so only the scanned bar is
/// compared against its value.
async fn partition(ctx: &StepContext, range: Range<usize>) -> Result<usize, Cancelled> {
    let pivot = range.end - 1;
    let pivot_value = ctx.value(pivot);
    ctx.highlight(&[pivot], Focus::Pivot);

    let mut store = range.start;
    for j in range.start..pivot {
        ctx.checkpoint()?;
        if ctx.compare_with(j, pivot_value, Focus::Compared) == Ordering::Less {
            ctx.swap(store, j);
            ctx.await_step().await?;
            ctx.clear(&[store, j]);
            store += 1;
        } else {
            ctx.clear(&[j]);
        }
    }

    ctx.clear(&[pivot]);
    if store != pivot {
        ctx.swap(store, pivot);
        ctx.await_step().await?;
        ctx.clear(&[store, pivot]);
    }
    Ok(store)
}
