//! Tests for the shell runtime.

mod behaviour;
mod support;
