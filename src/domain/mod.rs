pub mod bcp47;
pub mod context;
pub mod error;
pub mod identity;
pub mod list;
pub mod media;
pub mod root;
pub mod track;
