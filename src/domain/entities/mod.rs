pub mod edit;
pub mod source;
pub mod table;
