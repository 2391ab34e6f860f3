pub mod ottu;
pub mod upayments;

pub use self::{ottu::Ottu, upayments::Upayments};
