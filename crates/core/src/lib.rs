//! Domain logic for the crackmes content lifecycle.
//!
//! Everything here is pure and synchronous: the error taxonomy, hex ids,
//! the visibility state machine, rating rules, artifact path construction
//! and input validation. Persistence lives in `crackmes-db`, orchestration in
//! `crackmes-content`.

pub mod error;
pub mod hex_id;
pub mod rating;
pub mod storage;
pub mod types;
pub mod validation;
pub mod visibility;
