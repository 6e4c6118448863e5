//! Typed host-boundary contracts shared by the desktop runtime and its host adapters.
//!
//! The simulation itself runs behind an external command boundary (a desktop host process or a
//! test double). This crate only describes that boundary and the clock helpers the runtime
//! stamps records with; concrete transports live with the embedding shell.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod commands;
pub mod time;

pub use commands::{CommandFuture, CommandInvoker, MemoryCommandInvoker, NoopCommandInvoker};
pub use time::{elapsed_ms, unix_time_ms_now};
