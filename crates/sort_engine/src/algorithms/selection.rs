use std::cmp::Ordering;

use shared::domain::Focus;

use super::StepContext;
use crate::pacing::Cancelled;

/// Paces every scanned comparison (uncounted); the single swap per outer pass
/// is counted but not paced on its own.
pub(super) async fn sort(ctx: &StepContext) -> Result<(), Cancelled> {
    let len = ctx.len();
    for i in 0..len - 1 {
        ctx.checkpoint()?;
        ctx.highlight(&[i], Focus::Pivot);
        let mut min = i;
        let mut min_value = ctx.value(i);
        for j in i + 1..len {
            ctx.checkpoint()?;
            if ctx.compare_with(j, min_value, Focus::Scanning) == Ordering::Less {
                min = j;
                min_value = ctx.value(j);
            }
            ctx.await_step().await?;
            ctx.clear(&[j]);
        }
        if min != i {
            ctx.swap(i, min);
        }
        ctx.clear(&[i, min]);
    }
    Ok(())
}
