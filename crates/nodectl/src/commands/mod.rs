//! Command execution layer

pub mod status;
