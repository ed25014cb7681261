//! Value objects - validated domain primitives

mod phone_number;

pub use phone_number::{PhoneNumber, PhoneNumberParseError};
