//! Ethos API adapter

pub mod client;

pub use client::EthosClientImpl;
