pub mod blocking;
pub mod logging;
pub mod store;
pub mod time;

pub use glimpse_protocol::{AppError, AppResult, ResultExt};
