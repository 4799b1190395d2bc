pub mod auth;
pub mod documents;
pub mod generic;
pub mod health;
pub mod reports;
