pub mod feedback;
pub mod ui;
