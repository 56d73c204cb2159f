//! Domain services. Handlers stay thin and call into these.

pub mod posts;
pub mod users;
