//! Browser glue shared by components.

pub mod board_config;
pub mod canvas_input;
pub mod canvas_viewport;
pub mod capture;
