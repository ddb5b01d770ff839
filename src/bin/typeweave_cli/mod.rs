//! CLI subcommand implementations for typeweave

pub mod assemble;
pub mod describe;
pub mod inspect;
pub mod logging;
pub mod merge;
pub mod pack;
