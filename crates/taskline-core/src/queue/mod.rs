//! Queue module: the priority-ordered pending collection.

mod pending;

pub use pending::PendingQueue;
