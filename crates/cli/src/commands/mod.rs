pub mod admin;
pub mod auth;
pub mod pay;
pub mod projects;
pub mod requests;
