pub mod context;
pub mod controller;
pub mod dispatcher;
pub mod scanner;

pub use context::EngineContext;
pub use controller::EngineController;
pub use dispatcher::dispatch_tick;
pub use scanner::scan_tick;
