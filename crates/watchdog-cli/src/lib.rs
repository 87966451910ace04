//! Library half of the watchdog CLI, so command functions can be tested directly

pub mod commands;
