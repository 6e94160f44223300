// Repository Implementations

pub mod certificate_repository;
pub mod nag_state_store;
pub mod registration_repository;

pub use certificate_repository::CertificateRepositoryImpl;
pub use nag_state_store::NagStateStoreImpl;
pub use registration_repository::RegistrationRepositoryImpl;
