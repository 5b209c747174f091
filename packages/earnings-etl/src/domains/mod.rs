//! Business domains.

pub mod companies;
pub mod earnings;
pub mod news;
pub mod sentiment;
