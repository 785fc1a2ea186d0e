pub mod accounts;
pub mod password;
pub mod signin_limiter;

pub use accounts::AccountService;
pub use password::PasswordHasher;
pub use signin_limiter::SigninLimiter;
