//! nodectl - CLI for node status and health reporting

pub mod cli;
pub mod commands;
pub mod output;
