//! Target priority selection.

use crate::Target;

/// Pick the single highest-priority active target.
///
/// Highest severity wins; ties go to the earliest entry in `targets`.
/// Returns `None` if no target is active.
#[inline]
pub fn select_target(targets: &[Target]) -> Option<&Target> {
    select_target_where(targets, |_| true)
}

/// Like [`select_target`] but only considers targets for which `eligible`
/// returns `true` (in addition to `is_active`).
pub fn select_target_where<F>(targets: &[Target], mut eligible: F) -> Option<&Target>
where
    F: FnMut(&Target) -> bool,
{
    let mut best: Option<&Target> = None;
    for target in targets.iter().filter(|t| t.is_active) {
        if !eligible(target) {
            continue;
        }
        // Strictly greater only: an equal severity later in the list never
        // displaces an earlier one.
        if best.is_none_or(|b| target.severity > b.severity) {
            best = Some(target);
        }
    }
    best
}
