//! Services used by the HTTP layer and at startup

pub mod bootstrap;
pub mod uploads;

pub use uploads::StoredFile;
