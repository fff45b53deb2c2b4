pub mod config_entries;
pub mod spins;
pub mod users;

pub use config_entries as config_entity;
pub use spins as spin_entity;
pub use users as user_entity;
