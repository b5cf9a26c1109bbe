//! Per-cell observers
//!
//! The feature-map builders hand every computed (cell, class) result to a
//! [`CellObserver`]. The plain entry points use [`NoopObserver`];
//! [`TracingObserver`] emits one `trace!` event per result, and any
//! `FnMut(&CellRecord<T>)` closure can be used to collect or inspect values.

use tracing::trace;

/// Result of one (cell, class) evaluation
#[derive(Debug, Clone, Copy)]
pub struct CellRecord<'a, T> {
    /// Spatial coordinate, `[x, y]` or `[x, y, z]`
    pub cell: &'a [u32],
    /// Class index
    pub class: u32,
    /// One ring mean per radius
    pub means: &'a [T],
    /// One ring variance per radius, when variances are computed
    pub variances: Option<&'a [T]>,
}

/// Receives every (cell, class) result of a feature-map computation.
pub trait CellObserver<T> {
    /// Called once per (cell, class), in class-major then row-major order
    fn observe(&mut self, record: &CellRecord<'_, T>);
}

/// Observer that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl<T> CellObserver<T> for NoopObserver {
    #[inline]
    fn observe(&mut self, _record: &CellRecord<'_, T>) {}
}

/// Observer that logs every result at `TRACE` level
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl<T: std::fmt::Debug> CellObserver<T> for TracingObserver {
    fn observe(&mut self, record: &CellRecord<'_, T>) {
        trace!(
            cell = ?record.cell,
            class = record.class,
            means = ?record.means,
            variances = ?record.variances,
            "context features"
        );
    }
}

impl<T, F> CellObserver<T> for F
where
    F: FnMut(&CellRecord<'_, T>),
{
    #[inline]
    fn observe(&mut self, record: &CellRecord<'_, T>) {
        self(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notify<O: CellObserver<f64>>(observer: &mut O) {
        let means = [0.5, 0.25];
        observer.observe(&CellRecord {
            cell: &[1, 2],
            class: 3,
            means: &means,
            variances: None,
        });
    }

    #[test]
    fn test_closure_observer() {
        let mut seen = Vec::new();
        let mut collect = |r: &CellRecord<'_, f64>| seen.push((r.cell.to_vec(), r.class, r.means[1]));
        notify(&mut collect);
        assert_eq!(seen, vec![(vec![1, 2], 3, 0.25)]);
    }

    #[test]
    fn test_builtin_observers() {
        notify(&mut NoopObserver);
        notify(&mut TracingObserver);
    }
}
