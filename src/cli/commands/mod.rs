mod command_result;
pub mod diff;
pub mod export;
pub mod extract;
pub mod glossary;
pub mod helper;
pub mod init;
pub mod review;
pub mod status;
pub mod sync;
pub mod translate;

pub use command_result::*;
