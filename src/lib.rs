pub mod cli;
pub mod commands;
pub mod config;
pub mod keys;
pub mod receipt;
pub mod rpc;
pub mod script;
pub mod simulator;
pub mod toolchain;
