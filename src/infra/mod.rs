pub mod codec;
pub mod download;
