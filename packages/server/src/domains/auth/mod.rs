// Authentication domain: bearer-token issuing and verification

mod jwt;

pub use jwt::{Claims, JwtService};
