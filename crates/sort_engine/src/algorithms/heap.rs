use std::cmp::Ordering;

use shared::domain::Focus;

use super::StepContext;
use crate::pacing::Cancelled;

pub(super) async fn sort(ctx: &StepContext) -> Result<(), Cancelled> {
    let len = ctx.len();
    for root in (0..len / 2).rev() {
        ctx.checkpoint()?;
        sift_down(ctx, root, len).await?;
    }
    for end in (1..len).rev() {
        ctx.checkpoint()?;
        ctx.swap(0, end);
        ctx.await_step().await?;
        ctx.clear(&[0, end]);
        sift_down(ctx, 0, end).await?;
    }
    Ok(())
}

/// Restores the max-heap property below `root` within `..heap_len`. Only the
/// swaps are counted and paced; the descent follows the swapped child.
async fn sift_down(ctx: &StepContext, mut root: usize, heap_len: usize) -> Result<(), Cancelled> {
    loop {
        ctx.checkpoint()?;
        let left = 2 * root + 1;
        if left >= heap_len {
            return Ok(());
        }
        let right = left + 1;
        let mut largest = root;
        if ctx.compare(left, largest, Focus::Compared) == Ordering::Greater {
            largest = left;
        }
        if right < heap_len {
            if ctx.compare(right, largest, Focus::Compared) == Ordering::Greater {
                largest = right;
            }
            ctx.clear(&[root, left, right]);
        } else {
            ctx.clear(&[root, left]);
        }
        if largest == root {
            return Ok(());
        }
        ctx.swap(root, largest);
        ctx.await_step().await?;
        ctx.clear(&[root, largest]);
        root = largest;
    }
}
