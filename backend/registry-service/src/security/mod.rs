pub mod jwt;
pub mod password;

pub use jwt::{Claims, TokenIssuer};
pub use password::{Argon2Hasher, PasswordHasher};
