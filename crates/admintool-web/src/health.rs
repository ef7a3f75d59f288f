//! TCP reachability probes for the backends the admin pages depend on.

use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use admintool_core::context::{HealthCheck, HealthError};

pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_millis(250);

/// Connects to `addr`; the backend counts as up if any resolved address
/// accepts the connection within the timeout.
pub(crate) struct TcpProbe {
    flag: String,
    addr: String,
    timeout: Duration,
}

impl TcpProbe {
    pub(crate) fn new(flag: &str, addr: &str) -> Self {
        Self {
            flag: flag.to_string(),
            addr: addr.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl HealthCheck for TcpProbe {
    fn flag(&self) -> &str {
        &self.flag
    }

    fn check(&self) -> Result<bool, HealthError> {
        let addrs = self
            .addr
            .to_socket_addrs()
            .map_err(|e| HealthError(format!("{}: {}", self.addr, e)))?;
        Ok(addrs
            .into_iter()
            .any(|a| TcpStream::connect_timeout(&a, self.timeout).is_ok()))
    }
}

/// Probes for the configured backends, skipping unset addresses.
pub(crate) fn probes(targets: &[(&str, Option<&String>)]) -> Vec<Box<dyn HealthCheck>> {
    targets
        .iter()
        .filter_map(|(flag, addr)| {
            addr.map(|a| Box::new(TcpProbe::new(flag, a)) as Box<dyn HealthCheck>)
        })
        .collect()
}
