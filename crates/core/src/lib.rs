//! `lithoframe-core`: mineral-composition reconciliation engine.
//!
//! Pure engine crate: receives decoded pixels and pre-parsed rows, routes
//! them to per-palette accumulators, enforces metadata consistency, and
//! collapses fine-grained categories into reduced ones. No CLI or IO
//! dependencies.

pub mod classify;
pub mod error;
pub mod fields;
pub mod frame;
pub mod model;
pub mod palette;
pub mod table;
pub mod translate;

pub use classify::{Classifier, Composition};
pub use error::FrameError;
pub use fields::{FieldSpec, RequiredField};
pub use frame::Frame;
pub use model::{ImageInput, Row, Value};
pub use palette::Palette;
pub use table::Table;
