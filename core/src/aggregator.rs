use crate::worker_pool::PartialResult;

/// Folds all partial results into the final result.
///
/// `reducer` must be associative and commutative over the key space: the
/// pool promises completeness of the partials but no arrival order, so the
/// outcome must not depend on the order of the fold. An empty partial set
/// reduces to `R::default()`. No side effects.
pub fn reduce<R, F>(partials: Vec<PartialResult<R>>, reducer: &F) -> R
where
    R: Default,
    F: Fn(R, R) -> R,
{
    partials
        .into_iter()
        .map(|partial| partial.value)
        .fold(R::default(), reducer)
}
