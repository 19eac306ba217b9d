// Trace tree library - exposes all core modules for testing

pub mod config;
pub mod services;
pub mod trace;
pub mod view;
