pub mod catalog;
pub mod prompt;
pub mod session;
pub mod sommelier;

pub use crate::domain::model::{UserPreferences, WineRecord};
pub use crate::domain::ports::{ConfigProvider, TextGenerator, WineSource};
pub use crate::utils::error::Result;
