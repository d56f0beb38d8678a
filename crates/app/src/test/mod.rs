//! Test support shared by the service tests.
