//! Robointel Link — resolves extracted entity mentions to canonical
//! entities via fuzzy trigram similarity over names and aliases.

pub mod linker;
pub mod similarity;
pub mod types;

pub use linker::EntityLinker;
pub use similarity::trigram_similarity;
pub use types::*;
