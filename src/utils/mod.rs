pub mod auth;
pub mod body;
pub mod clock;
pub mod error;
pub mod jwt;
pub mod logging;
pub mod response;

pub use clock::{Clock, ManualClock, SharedClock, SystemClock};
pub use error::AppError;
pub use response::{BaseResponse, ErrorResponse};
