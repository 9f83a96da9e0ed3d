pub mod queue;
pub mod tracker;

pub use queue::CompletionQueue;
pub use tracker::CompletionTracker;
