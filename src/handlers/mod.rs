pub mod driver;
pub mod quote;
