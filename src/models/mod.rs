pub mod booking;
pub mod taxi;
pub mod user;
