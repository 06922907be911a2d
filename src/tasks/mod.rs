//! Background Tasks Module
//!
//! Contains work the server hands off to the runtime instead of running
//! inline with a request.
//!
//! # Tasks
//! - Insert: stores a freshly rendered response after the client was answered

mod insert;

pub use insert::{spawn_insert, PendingInsert};
