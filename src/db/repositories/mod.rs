//! Repository layer
//!
//! Each repository pairs a trait defining the data-access interface with a
//! SQLx implementation, so services depend on `Arc<dyn …>` seams.

pub mod captcha;
pub mod category;
pub mod news;
pub mod session;
pub mod user;

pub use captcha::{CaptchaRepository, SqlxCaptchaRepository};
pub use category::{CategoryRepository, SqlxCategoryRepository};
pub use news::{NewsRepository, SqlxNewsRepository};
pub use session::{SessionRepository, SqlxSessionRepository};
pub use user::{SqlxUserRepository, UserRepository};
