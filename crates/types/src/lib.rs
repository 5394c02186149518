// crates/types/src/lib.rs
//! Wire types shared between the lookup backend client, the job tracker
//! and the command-line front end.

pub mod job;
pub mod query;
pub mod report;

pub use job::*;
pub use query::*;
pub use report::*;
