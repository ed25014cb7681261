//! Request extractors

mod phone_path;
mod validated;

pub use phone_path::PhonePath;
pub use validated::ValidatedJson;
