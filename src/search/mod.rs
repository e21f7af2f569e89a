//! Deadline-bounded local search.
//!
//! - [`SearchConfig`]: acceptance policy, deadline margins, move families
//! - [`SearchRunner`]: the search loop
//! - [`SearchResult`]: best solution and run statistics

mod config;
mod result;
mod runner;

pub use config::{AcceptancePolicy, SearchConfig};
pub use result::SearchResult;
pub use runner::SearchRunner;
