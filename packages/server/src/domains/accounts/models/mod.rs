mod customer;
mod user;

pub use customer::CustomerProfile;
pub use user::User;
