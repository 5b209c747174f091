pub mod models;

pub use models::Company;
