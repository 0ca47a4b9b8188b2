pub mod run;
pub mod test_config;

pub use run::*;
pub use test_config::*;
