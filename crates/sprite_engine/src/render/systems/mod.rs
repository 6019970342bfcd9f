//! Render systems
//!
//! Systems turn game-side components into scene proxies and mesh batches.

pub mod billboard;
