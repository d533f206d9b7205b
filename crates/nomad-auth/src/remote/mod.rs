//! Remote verification against the Desert Nomad auth server.

pub mod client;

pub use client::DesertNomadClient;
