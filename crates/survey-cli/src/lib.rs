//! Library components of the survey CLI.

pub mod input;
pub mod logging;
pub mod output;
pub mod window;
