pub mod config;
pub mod controller;
pub mod input;
pub mod shortcuts;
pub mod sync;

pub use config::ViewerConfig;
pub use controller::ViewportController;
pub use input::InputEvent;
pub use shortcuts::{ShortcutAction, ShortcutMap};
pub use sync::{SourceSync, SyncOutcome};
