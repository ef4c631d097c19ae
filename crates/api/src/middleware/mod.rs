pub mod timeout;
pub mod user;
