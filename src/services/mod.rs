//! Business logic services

pub mod captcha;
pub mod mailer;
pub mod news;
pub mod password;
pub mod user;

pub use captcha::{CaptchaService, IssuedChallenge};
pub use mailer::{Mailer, SmtpMailer};
pub use news::{NewsService, NewsServiceError, NEWS_PAGE_SIZE};
pub use user::{RegisterInput, UserService, UserServiceError};
