pub mod models;

pub use models::EarningsEvent;
