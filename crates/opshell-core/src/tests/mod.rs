//! Behavioural tests for the opshell-core crate.

mod behaviour;
