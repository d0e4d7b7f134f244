//! Hook for observing the rays the integrator traces.

use lux_math::Point;

/// Receives one call per resolved ray segment, from its origin to the
/// point it hit.
///
/// Sinks are shared across worker threads, so any recording must use
/// interior mutability.
pub trait SegmentSink: Sync {
    fn segment(&self, from: Point, to: Point);
}

/// A sink that ignores every segment.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl SegmentSink for NoopSink {
    #[inline]
    fn segment(&self, _from: Point, _to: Point) {}
}
