// Accounts: registration, login with streak tracking, bearer-token auth.

pub mod extractor;
pub mod handlers;
pub mod password;
pub mod streak;
pub mod token;
pub mod users;

pub use extractor::AuthUser;
