// Requests domain: investigation requests and pairings
pub mod actions;
pub mod models;
