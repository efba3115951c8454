//! Core types and trait definitions for BCharity VMS.
//!
//! This crate models the values exchanged with the external social protocol
//! (profiles, publications, metadata attributes, open actions) and the
//! [`store::PublicationStore`] abstraction over that protocol. It has no
//! HTTP or database dependencies.

pub mod currency;
pub mod error;
pub mod profile;
pub mod publication;
pub mod session;
pub mod status;
pub mod store;
pub mod tag;

pub use error::{Error, Result};
