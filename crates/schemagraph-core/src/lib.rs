//! # Schemagraph core
//!
//! Turns typed business metadata into interlinked schema.org JSON-LD
//! documents, one per page of a site.
//!
//! ```text
//! GenerationRequest ──► builders ──► assemble ──► Document ──► output (JSON / <script> / ZIP)
//!                          │             │            │
//!                  IdentifierRegistry  EmbedPolicy  validate / links
//! ```
//!
//! - [`ids`]: stable `@id` per `(role, base URL)`.
//! - [`builders`]: one pure function per schema.org type.
//! - [`assemble`]: per-page graphs with the `isPartOf` chain and stubs for
//!   shared entities defined elsewhere in the run.
//! - [`validate`]: required/recommended field presence per primary type.
//! - [`links`]: run-level audit of cross-document references.
//! - [`generate`]: drives a whole run from a [`GenerationRequest`].

pub mod assemble;
pub mod builders;
pub mod fields;
pub mod generate;
pub mod ids;
pub mod links;
pub mod node;
pub mod output;
pub mod request;
pub mod validate;

pub use assemble::{assemble, ChainLink, ChainSpec, Document, Embed, EmbedPolicy, GraphEntry};
pub use builders::{Entity, Site};
pub use generate::{generate, Generation};
pub use ids::{IdentifierRegistry, Role, SharedEntity};
pub use links::{audit, LinkReport};
pub use output::OutputError;
pub use request::{GenerationRequest, PageKind, PageRequest, PageSpec};
pub use validate::{validate, ValidationIssue, ValidationReport};
