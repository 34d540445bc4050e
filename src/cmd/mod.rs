pub mod grid;
pub mod init;
pub mod range;
pub mod root;
