mod admin;
mod error;
mod health;
mod requests;

pub use admin::{
    approve_investigator_handler, delete_customer_handler, delete_investigator_handler,
    list_pending_investigators_handler,
};
pub use error::ApiError;
pub use health::health_handler;
pub use requests::{
    assign_request_handler, cancel_request_handler, complete_request_handler,
    create_request_handler, list_my_requests_handler,
};
