pub mod debug;
pub mod formatting;
pub mod text;
