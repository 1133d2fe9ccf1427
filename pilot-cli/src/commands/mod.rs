pub mod deploy;
pub mod diff;
pub mod generate;
pub mod init;
pub mod plan;
pub mod project;
