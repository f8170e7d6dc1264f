// Accounts domain: users and customer profiles
pub mod models;
