pub mod back_to_top;
pub mod carousel;
pub mod config;
pub mod driver;
pub mod events;
pub mod fixture;
pub mod page;
pub mod script;
pub mod sys;
