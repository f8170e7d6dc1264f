// Investigators domain: vetted investigator profiles
pub mod models;
