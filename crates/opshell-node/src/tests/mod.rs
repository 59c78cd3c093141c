//! Behavioural tests for the opshell-node crate.
