//! Out-of-band maintenance for the crackmes content store.
//!
//! - [`repair`]: recompute `nb_solutions` / `nb_comments` from the live
//!   records and overwrite drifted values.
//! - [`audit`]: walk the artifact storage roots and report files that no
//!   live record accounts for.

pub mod audit;
pub mod config;
pub mod repair;
