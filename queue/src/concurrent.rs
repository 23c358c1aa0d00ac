mod cancellation_token;
mod cancellation_token_test;

pub use self::cancellation_token::*;
