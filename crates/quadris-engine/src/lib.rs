pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum HoldError {
    #[display("no active piece to hold")]
    NoActivePiece,
    #[display("hold already used for this piece")]
    AlreadyUsed,
}
