pub mod analysis;
pub mod creation;
pub mod modification;
pub mod query;
