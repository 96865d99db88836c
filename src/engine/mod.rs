pub mod fleet;
pub mod progression;
