//! Replica execution over an optional rayon worker pool.
//!
//! Each item is processed by exactly one worker and owns everything it
//! mutates, so results do not depend on whether the pool is used.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Applies `f` to every item, in parallel when `parallel` is set and the
/// `parallel` feature is enabled. Returns once every item is done.
pub(crate) fn for_each_mut<T, F>(items: &mut [T], parallel: bool, f: F)
where
    T: Send,
    F: Fn(&mut T) + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        if parallel {
            items.par_iter_mut().for_each(f);
            return;
        }
    }
    #[cfg(not(feature = "parallel"))]
    let _ = parallel;
    items.iter_mut().for_each(f);
}

/// Maps `0..count` through `f`, preserving index order in the output.
pub(crate) fn map_indexed<U, F>(count: usize, parallel: bool, f: F) -> Vec<U>
where
    U: Send,
    F: Fn(usize) -> U + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        if parallel {
            return (0..count).into_par_iter().map(f).collect();
        }
    }
    #[cfg(not(feature = "parallel"))]
    let _ = parallel;
    (0..count).map(f).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_each_mut_visits_all() {
        for parallel in [false, true] {
            let mut items = vec![1, 2, 3, 4];
            for_each_mut(&mut items, parallel, |x| *x *= 10);
            assert_eq!(items, vec![10, 20, 30, 40]);
        }
    }

    #[test]
    fn test_map_indexed_keeps_order() {
        for parallel in [false, true] {
            let out = map_indexed(6, parallel, |i| i * i);
            assert_eq!(out, vec![0, 1, 4, 9, 16, 25]);
        }
    }
}
