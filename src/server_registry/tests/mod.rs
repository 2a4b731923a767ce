//! Unit tests for the server registry module.
