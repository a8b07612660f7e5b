// Outbound calls to the Nextcloud instance hosting this app

pub mod client;
pub mod common;
pub mod gateway;

pub use client::{GatewayError, NextcloudClient};
pub use gateway::RemoteFileGateway;

#[cfg(test)]
mod tests;
