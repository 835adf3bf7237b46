pub mod let_also;
pub mod serde;

pub use let_also::LetAlso;
