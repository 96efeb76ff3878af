pub mod memory_api;
