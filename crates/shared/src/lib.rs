//! Domain records and error types shared by the tracker core and its front ends.

pub mod domain;
pub mod error;
