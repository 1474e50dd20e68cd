//! Unit tests for pgstrap
//!
//! These tests use mocked ports and run fast without docker, sudo, or a
//! database server.

mod architecture;
mod container_service;
mod docker_cli;
mod helpers;
mod mocks;
mod prerequisites_service;
mod reconfigure_service;
