pub mod resolver;

pub use crate::domain::model::Resolution;
pub use crate::domain::ports::CloudController;
pub use crate::utils::error::Result;
