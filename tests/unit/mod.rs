//! Integration tests for the option chain loader.

mod file_loader_tests;
mod manager_tests;
mod sqlite_loader_tests;
