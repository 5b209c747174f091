pub mod collector;
pub mod models;
pub mod windows;

pub use collector::{CollectSummary, NewsCollector};
pub use models::{Article, NewArticle};
pub use windows::{NewsWindow, WindowPlanner, WindowTier};
