//! Domain model for catalog recipes and persisted favorites.
//!
//! # Responsibility
//! - Define the two recipe representations (remote/transient and
//!   local/persisted) and the mapping between them.
//! - Own the wire-format decoding for the remote catalog JSON.
//!
//! # Invariants
//! - Both representations are identified by the same catalog `id`.
//! - Conversion to the persisted shape always resets user-overlay
//!   fields to their defaults; conversion back copies them verbatim.

pub mod convert;
pub mod favorite;
pub mod recipe;
