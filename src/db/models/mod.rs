// Database Models

pub mod certificate;
pub mod nag_state;
pub mod registration;

pub use certificate::{CertificateRecord, STATUS_REVOKED, STATUS_VALID};
pub use nag_state::NagStateRecord;
pub use registration::RegistrationRecord;
