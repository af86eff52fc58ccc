#![forbid(unsafe_code)]

pub mod account_store;
pub mod atm;
pub mod console;
pub mod json_parser;
pub mod types;
