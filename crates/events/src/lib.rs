//! Content events and the best-effort notification fan-out.
//!
//! - [`ContentEvent`] describes something that happened to a crackme,
//!   solution or comment and knows which users hear about it.
//! - [`Notifier`] writes those notifications through the Entity Store on
//!   the caller's task. Delivery failures are logged and dropped.

pub mod event;
pub mod notifier;

pub use event::ContentEvent;
pub use notifier::Notifier;
