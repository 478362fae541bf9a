//! # Adapters Layer (Hexagonal Architecture)
//!
//! Implements outbound port traits: an HS256 commit signer, a static DID
//! resolver and an in-process Hub.

mod hs256_signer;
mod memory_hub;
mod static_resolver;

pub use hs256_signer::Hs256CommitSigner;
pub use memory_hub::InMemoryHub;
pub use static_resolver::StaticResolver;
