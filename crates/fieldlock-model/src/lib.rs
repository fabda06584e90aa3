//! Fieldlock Model: a small in-memory object mapper
//!
//! Shows the two places an object mapper hooks into fieldlock: the
//! assignment hook ([`MemoryStore::set`]) and the delete hook
//! ([`MemoryStore::delete`]). Quiet denials come back as
//! [`Effect::Ignored`](fieldlock_policy::Effect); strict ones as errors.

pub mod record;
pub mod store;

pub use record::Record;
pub use store::MemoryStore;
