//! Standby-role guard for the active/standby database pair.
//!
//! The report job must only run on the standby node. The guard probes the
//! mated (active) node over TCP: a completed connect means the active mate
//! is up and reachable, therefore this host is the standby and may run.
//! A refused or timed-out probe means this host may itself be the active
//! node, and the caller must abort before touching the database.
//!
//! This is a liveness probe, not a reliable role oracle - a partition or a
//! restarting mate can flip the answer either way. The polarity is load
//! bearing for existing deployments and must not be inverted.

use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

pub struct StandbyGuard {
    peer_host: String,
    peer_port: u16,
    timeout: Duration,
}

impl StandbyGuard {
    pub fn new(peer_host: impl Into<String>, peer_port: u16, timeout: Duration) -> Self {
        Self {
            peer_host: peer_host.into(),
            peer_port,
            timeout,
        }
    }

    /// Probe the mated node once. `true` means it is safe to run here.
    pub fn is_standby(&self) -> bool {
        let target = (self.peer_host.as_str(), self.peer_port);
        let addrs = match target.to_socket_addrs() {
            Ok(addrs) => addrs,
            Err(e) => {
                log::warn!(
                    "Could not resolve mated node {}:{}: {}",
                    self.peer_host,
                    self.peer_port,
                    e
                );
                return false;
            }
        };

        for addr in addrs {
            match TcpStream::connect_timeout(&addr, self.timeout) {
                Ok(_) => {
                    log::info!("Active mate {} is reachable; this node is standby", addr);
                    return true;
                }
                Err(e) => {
                    log::debug!("Probe of mated node {} failed: {}", addr, e);
                }
            }
        }

        false
    }
}
