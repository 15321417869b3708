//! Service-level abstractions shared across the core.

pub mod hash;
