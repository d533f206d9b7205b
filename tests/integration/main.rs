//! End-to-end tests of the wired chain against a mock Desert Nomad server.

mod helpers;

mod login_flow_test;
mod remote_failure_test;
