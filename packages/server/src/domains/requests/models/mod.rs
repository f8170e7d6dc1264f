mod investigator_match;
mod request;

pub use investigator_match::InvestigatorMatch;
pub use request::{InvestigationRequest, RequestStatus};
