pub mod auth;
pub mod doctors;
pub mod health;
pub mod patients;
