//! End-to-end pipeline tests with scripted collaborators.

mod mocks;
mod scenarios;
