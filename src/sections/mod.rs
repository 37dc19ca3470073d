//! Section mapping and its live registry
//!
//! - [`SectionMapping`] - validated, ordered label -> upstream section id pairs
//! - [`SectionRegistry`] - process-wide holder with snapshot reads and
//!   persist-then-swap updates
//! - [`SectionKind`] - movie vs show classification derived from the label

mod mapping;
mod registry;

pub use mapping::{MOVIES_LABEL, Section, SectionKind, SectionMapping, ValidationError};
pub use registry::{RegistryError, SectionRegistry};
