#![forbid(unsafe_code)]

pub mod humantime_serde;
pub mod secret_string;

pub use secret_string::SecretString;
