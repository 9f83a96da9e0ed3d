pub mod completion;
pub mod task;

pub use completion::{CompletionOutcome, CompletionStats};
pub use task::{ExpiredTask, Task, TaskId, TaskPhase, TaskView};
