//! Float curves keyed on distance
//!
//! Billboard elements sample these with the camera-to-pivot distance to get a
//! size or opacity multiplier.

use std::fmt::Debug;
use std::sync::Arc;

/// A scalar function of distance
pub trait DistanceCurve: Send + Sync + Debug {
    /// Sample the curve
    fn evaluate(&self, distance: f32) -> f32;
}

/// Shared handle to a curve asset
pub type CurveRef = Arc<dyn DistanceCurve>;

/// A single curve key
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveKey {
    /// Input value (distance)
    pub time: f32,
    /// Output value
    pub value: f32,
}

/// Piecewise linear float curve
///
/// Keys are kept sorted by time. Outside the key range the first or last
/// value is held.
#[derive(Debug, Clone)]
pub struct CurveFloat {
    keys: Vec<CurveKey>,
    default_value: f32,
}

impl CurveFloat {
    /// Create an empty curve; evaluates to `1.0` until keys are added
    pub fn new() -> Self {
        Self {
            keys: Vec::new(),
            default_value: 1.0,
        }
    }

    /// Create a curve from `(time, value)` pairs in any order
    pub fn from_keys(keys: impl IntoIterator<Item = (f32, f32)>) -> Self {
        let mut curve = Self::new();
        for (time, value) in keys {
            curve.add_key(time, value);
        }
        curve
    }

    /// Create a curve that returns `value` everywhere
    pub fn constant(value: f32) -> Self {
        Self {
            keys: Vec::new(),
            default_value: value,
        }
    }

    /// Insert a key, replacing any key at the same time
    ///
    /// Keys with a NaN time have no place in the ordering and are dropped.
    pub fn add_key(&mut self, time: f32, value: f32) {
        if time.is_nan() {
            log::warn!("Ignoring curve key with NaN time (value {})", value);
            return;
        }
        let index = self.keys.partition_point(|key| key.time < time);
        match self.keys.get_mut(index) {
            Some(existing) if existing.time == time => existing.value = value,
            _ => self.keys.insert(index, CurveKey { time, value }),
        }
    }

    /// Sorted keys
    pub fn keys(&self) -> &[CurveKey] {
        &self.keys
    }

    /// Wrap in a shared handle
    pub fn into_ref(self) -> CurveRef {
        Arc::new(self)
    }
}

impl Default for CurveFloat {
    fn default() -> Self {
        Self::new()
    }
}

impl DistanceCurve for CurveFloat {
    fn evaluate(&self, distance: f32) -> f32 {
        let (Some(first), Some(last)) = (self.keys.first(), self.keys.last()) else {
            return self.default_value;
        };

        if distance.is_nan() || distance <= first.time {
            return first.value;
        }
        if distance >= last.time {
            return last.value;
        }

        let upper = self.keys.partition_point(|key| key.time <= distance);
        let (Some(&a), Some(&b)) = (upper.checked_sub(1).and_then(|i| self.keys.get(i)), self.keys.get(upper)) else {
            return last.value;
        };
        let span = b.time - a.time;
        if span <= 0.0 {
            return a.value;
        }
        let alpha = (distance - a.time) / span;
        a.value + (b.value - a.value) * alpha
    }
}
