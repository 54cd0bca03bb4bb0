//! # catsync common
//!
//! Domain models and outbound ports shared by the reconciler and its front ends.
//!
//! * **[`registration`]**: the locally assembled input record.
//! * **[`catalog`]**: entities and request payloads of the remote catalog.
//! * **[`client`]** / **[`aliases`]**: traits the reconciler depends on.
//!     * Implemented outside this crate (see `catsync-core` adapters).

pub mod aliases;
pub mod catalog;
pub mod client;
pub mod config;
pub mod error;
pub mod registration;
