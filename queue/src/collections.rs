mod element;
mod queue;
mod queue_sync;

pub use self::{element::*, queue::*, queue_sync::*};
