pub mod controller;
pub mod state;
pub mod view;
