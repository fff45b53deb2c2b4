pub mod init_data;
pub mod selector;

pub use init_data::{InitDataVerifier, VerifiedUser};
