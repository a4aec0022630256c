pub mod store;
pub mod types;

pub use store::{apply_fragment, TranscriptStore};
pub use types::{CallSummary, Message, Role};
