use std::cmp::Ordering;

use shared::domain::Focus;

use super::StepContext;
use crate::pacing::Cancelled;

/// Each shift of a larger element one slot right is a counted, paced write.
/// Dropping the key into the final hole is shown but not counted.
pub(super) async fn sort(ctx: &StepContext) -> Result<(), Cancelled> {
    for i in 1..ctx.len() {
        ctx.checkpoint()?;
        insert(ctx, i).await?;
    }
    Ok(())
}

async fn insert(ctx: &StepContext, i: usize) -> Result<(), Cancelled> {
    let key = ctx.value(i);
    ctx.highlight(&[i], Focus::Pivot);

    // `hole` is the slot whose value is duplicated to its right while the
    // key is held outside the sequence.
    let mut hole = i;
    match shift_greater(ctx, key, &mut hole).await {
        Ok(()) => {
            ctx.place(hole, key);
            ctx.clear(&[hole, i]);
            Ok(())
        }
        Err(cancelled) => {
            ctx.restore(hole, &[key]);
            Err(cancelled)
        }
    }
}

async fn shift_greater(
    ctx: &StepContext,
    key: u32,
    hole: &mut usize,
) -> Result<(), Cancelled> {
    while *hole > 0 {
        ctx.checkpoint()?;
        if ctx.compare_with(*hole - 1, key, Focus::Compared) != Ordering::Greater {
            ctx.clear(&[*hole - 1]);
            break;
        }
        let shifted = ctx.value(*hole - 1);
        ctx.write(*hole, shifted);
        *hole -= 1;
        ctx.await_step().await?;
        ctx.clear(&[*hole, *hole + 1]);
    }
    Ok(())
}
