//! Value types shared between the sorting engine and its front ends.

pub mod domain;
pub mod error;
pub mod protocol;
