use std::cmp::Ordering;

use shared::domain::Focus;

use super::StepContext;
use crate::pacing::Cancelled;

/// Adjacent compare-and-swap passes; only swaps are counted and paced.
pub(super) async fn sort(ctx: &StepContext) -> Result<(), Cancelled> {
    let len = ctx.len();
    for pass in 0..len - 1 {
        ctx.checkpoint()?;
        for j in 0..len - pass - 1 {
            ctx.checkpoint()?;
            if ctx.compare(j, j + 1, Focus::Compared) == Ordering::Greater {
                ctx.swap(j, j + 1);
                ctx.await_step().await?;
            }
            ctx.clear(&[j, j + 1]);
        }
    }
    Ok(())
}
