//! Unit tests for the rideshare CLI commands.

mod helpers;
