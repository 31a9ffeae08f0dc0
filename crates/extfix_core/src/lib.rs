mod detect;
mod error;
mod registry;
mod window;

pub use detect::{Detection, Detector};
pub use error::{CoreError, Result};
pub use registry::{SignatureEntry, SignatureRegistry};
pub use window::{HeaderWindow, HEADER_WINDOW_LEN};
