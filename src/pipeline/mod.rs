//! Scan classification pipeline and its background worker.

mod classify;
mod worker;

pub use classify::{Config, Pipeline};
pub use worker::{ClassifierWorker, PendingVerdict, Scan};
