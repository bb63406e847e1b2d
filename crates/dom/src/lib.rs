//! Mutable XML document tree
//!
//! Arena-backed element tree with index-based parent links, a live tag
//! lookup, and the structural primitives the rule engine builds on.
//!
//! ## Core Design
//!
//! ```text
//! XML text → DomParser → Document (arena) → mutate → DomSerializer → XML text
//!                             ↓
//!                       NodeId (u32)
//! ```

pub mod document;
pub mod error;
pub mod parser;
pub mod serializer;
pub mod types;
pub mod utils;

pub use document::Document;
pub use error::{DomError, Result};
pub use parser::{DomParser, ParserConfig};
pub use serializer::{DomSerializer, SerializerConfig};
pub use types::*;
