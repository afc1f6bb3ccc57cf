//! UAVTalk Protocol - Core constants, error types, and collaborator traits.
//!
//! This module provides the foundational pieces shared by the codec, the
//! connection context, and the relay. It has minimal dependencies and
//! defines the seams to the external collaborators (object dictionary and
//! byte transport).

pub mod constants;
pub mod error;
pub mod traits;

pub use error::*;
pub use traits::*;
