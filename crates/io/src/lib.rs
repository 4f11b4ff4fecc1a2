// File decoding and encoding collaborators

pub mod csv;
pub mod error;
pub mod image;
pub mod las;
pub mod mnemonic;

pub use error::IoError;
