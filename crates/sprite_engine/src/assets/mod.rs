//! Asset types consumed by rendering components
//!
//! Only the pieces the billboard system reads are modelled here; loading and
//! serialization of these assets belongs to the asset pipeline.

pub mod curves;

pub use curves::{CurveFloat, CurveKey, CurveRef, DistanceCurve};
