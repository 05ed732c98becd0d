pub mod board;
pub mod calendar;
pub mod config;
pub mod filter;
pub mod permissions;
pub mod technician_panel;
pub mod work_order_form;
