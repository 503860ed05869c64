//! Piecewise-linear response curves used to reshape noise and mesh heights.

use std::sync::Arc;

/// A single `(time, value)` control point of a [`ResponseCurve`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CurveKey {
    /// Input coordinate.
    pub time: f64,
    /// Output value at `time`.
    pub value: f64,
}

impl CurveKey {
    /// Create a key.
    pub const fn new(time: f64, value: f64) -> Self {
        Self { time, value }
    }
}

/// An immutable piecewise-linear curve.
///
/// Keys are shared behind an `Arc`, so cloning a curve is a reference-count
/// bump and a curve can be read from any thread at the same time.
///
/// Evaluation rules:
/// - no keys: identity (`evaluate(x) == x`)
/// - one key: constant
/// - outside the key range: clamped to the first/last value
#[derive(Clone, Debug, PartialEq)]
pub struct ResponseCurve {
    keys: Arc<[CurveKey]>,
}

impl ResponseCurve {
    /// The identity curve.
    pub fn identity() -> Self {
        Self {
            keys: Arc::from(Vec::<CurveKey>::new()),
        }
    }

    /// A constant curve.
    pub fn constant(value: f64) -> Self {
        Self::from_keys([CurveKey::new(0.0, value)])
    }

    /// A straight segment from `(t0, v0)` to `(t1, v1)`, clamped outside it.
    pub fn linear(t0: f64, v0: f64, t1: f64, v1: f64) -> Self {
        Self::from_keys([CurveKey::new(t0, v0), CurveKey::new(t1, v1)])
    }

    /// Build a curve from arbitrary keys. Keys are sorted by time and
    /// non-finite keys are dropped.
    pub fn from_keys(keys: impl IntoIterator<Item = CurveKey>) -> Self {
        let mut keys: Vec<CurveKey> = keys
            .into_iter()
            .filter(|k| k.time.is_finite() && k.value.is_finite())
            .collect();
        keys.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self {
            keys: Arc::from(keys),
        }
    }

    /// Build a curve from `(time, value)` pairs.
    pub fn from_pairs(pairs: &[(f64, f64)]) -> Self {
        Self::from_keys(pairs.iter().map(|&(t, v)| CurveKey::new(t, v)))
    }

    /// The sorted control points.
    pub fn keys(&self) -> &[CurveKey] {
        &self.keys
    }

    /// Returns `true` if this curve has no keys and therefore passes values through.
    pub fn is_identity(&self) -> bool {
        self.keys.is_empty()
    }

    /// Evaluate the curve at `t`.
    pub fn evaluate(&self, t: f64) -> f64 {
        let keys = &*self.keys;
        let (first, last) = match keys {
            [] => return t,
            [only] => return only.value,
            [first, .., last] => (first, last),
        };

        if t.is_nan() || t <= first.time {
            return first.value;
        }
        if t >= last.time {
            return last.value;
        }

        // first.time < t < last.time, so 1 <= i < len.
        let i = keys.partition_point(|k| k.time <= t);
        let a = keys[i - 1];
        let b = keys[i];
        let span = b.time - a.time;
        if span <= 0.0 {
            return b.value;
        }
        let f = (t - a.time) / span;
        a.value + (b.value - a.value) * f
    }
}

impl Default for ResponseCurve {
    fn default() -> Self {
        Self::identity()
    }
}
