// Business domains
pub mod accounts;
pub mod auth;
pub mod investigators;
pub mod moderation;
pub mod requests;
