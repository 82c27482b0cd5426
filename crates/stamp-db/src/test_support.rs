//! Shared test utilities for stamp-db unit tests.
