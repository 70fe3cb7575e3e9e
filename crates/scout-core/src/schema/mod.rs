//! Schema model: ordered field definitions grouped into sections.
//!
//! Sections are purely organizational. Only the flattened field list matters
//! to storage, taken in section order then intra-section order; that is the
//! canonical field order used for column layout and positional decoding.

pub mod field;
pub mod game_config;

pub use field::{Choice, FieldSpec, FieldType, SqlType};
pub use game_config::{GameConfig, SectionSpec};
