//! Domain models for the Newsdesk site

pub mod captcha;
pub mod category;
pub mod news;
pub mod session;
pub mod user;

pub use captcha::CaptchaChallenge;
pub use category::Category;
pub use news::{CreateNewsInput, ListParams, News, PagedResult};
pub use session::Session;
pub use user::User;
