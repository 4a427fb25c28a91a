pub mod app;
pub mod display;
pub mod player;
pub mod scroller;
pub mod screens;
pub mod sources;
