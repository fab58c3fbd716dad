//! URI template subsystem.
//!
//! # Data Flow
//! ```text
//! User-entered path pattern ("/users/[id]")
//!     → tokenizer.rs (split into literal/variable segments)
//!     → key.rs (concatenate literal segments into a canonical key)
//!     → Used by the catalog for duplicate detection and display
//! ```
//!
//! # Design Decisions
//! - Permissive parsing: unmatched brackets are literal text, never an error
//! - No regex; a single linear scan over the input
//! - Empty literal pieces between adjacent variables are preserved
//!   (callers filter them for display)

pub mod key;
pub mod tokenizer;

pub use key::derive_key;
pub use tokenizer::{recompose, tokenize, Segment};
