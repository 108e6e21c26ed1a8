pub mod markup;
pub mod pr;
pub mod ui;
