mod investigator;

pub use investigator::{InvestigatorProfile, InvestigatorStatus};
