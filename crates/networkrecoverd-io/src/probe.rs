//! TCP reachability probe.

use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::{Duration, Instant};

/// Answers "is the internet reachable right now". Enables fake injection.
pub trait ReachabilityProbe: Send + Sync {
    /// `true` iff a connection to `host:port` succeeds within `timeout`.
    fn is_reachable(&self, host: &str, port: u16, timeout: Duration) -> bool;
}

impl<T: ReachabilityProbe + ?Sized> ReachabilityProbe for &T {
    fn is_reachable(&self, host: &str, port: u16, timeout: Duration) -> bool {
        (**self).is_reachable(host, port, timeout)
    }
}

/// Opens (and immediately drops) a TCP connection to the target.
///
/// Resolved addresses are tried in turn and share one `timeout` budget; an
/// address is only dialled while budget remains. Resolution failures,
/// refusals, timeouts and unreachable networks all map to `false`.
///
/// Name resolution goes through the system resolver and is not bounded by
/// `timeout`. Use an IP literal as the host to keep a probe within it.
#[derive(Debug, Default, Clone, Copy)]
pub struct TcpProbe;

impl ReachabilityProbe for TcpProbe {
    fn is_reachable(&self, host: &str, port: u16, timeout: Duration) -> bool {
        let addrs = match (host, port).to_socket_addrs() {
            Ok(addrs) => addrs,
            Err(e) => {
                tracing::debug!("cannot resolve {host}:{port}: {e}");
                return false;
            }
        };
        connect_within(addrs, timeout)
    }
}

/// `true` on the first address that accepts before `budget` runs out.
fn connect_within(addrs: impl IntoIterator<Item = SocketAddr>, budget: Duration) -> bool {
    let deadline = Instant::now() + budget;
    for addr in addrs {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            tracing::debug!("probe budget of {budget:?} spent before trying {addr}");
            return false;
        }
        match TcpStream::connect_timeout(&addr, remaining) {
            Ok(_stream) => return true,
            Err(e) => tracing::debug!("connect to {addr} failed: {e}"),
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;

    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(2);

    #[test]
    fn reachable_when_listener_accepts() {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().expect("addr").port();

        assert!(TcpProbe.is_reachable("127.0.0.1", port, TIMEOUT));
    }

    #[test]
    fn unreachable_when_port_closed() {
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
            listener.local_addr().expect("addr").port()
        };

        assert!(!TcpProbe.is_reachable("127.0.0.1", port, TIMEOUT));
    }

    #[test]
    fn zero_timeout_is_unreachable() {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().expect("addr").port();

        // A zero budget never dials; that is a failed check, not a panic.
        assert!(!TcpProbe.is_reachable("127.0.0.1", port, Duration::ZERO));
    }

    #[test]
    fn falls_through_to_next_address() {
        let closed = {
            let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
            listener.local_addr().expect("addr")
        };
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let open = listener.local_addr().expect("addr");

        assert!(connect_within([closed, open], TIMEOUT));
    }

    #[test]
    fn no_addresses_is_unreachable() {
        assert!(!connect_within(Vec::<SocketAddr>::new(), TIMEOUT));
    }

    #[test]
    fn spent_budget_skips_remaining_addresses() {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let open = listener.local_addr().expect("addr");

        let started = Instant::now();
        assert!(!connect_within([open, open, open], Duration::ZERO));
        assert!(started.elapsed() < TIMEOUT);
    }

    #[test]
    fn blanket_ref_impl() {
        struct Always;
        impl ReachabilityProbe for Always {
            fn is_reachable(&self, _host: &str, _port: u16, _timeout: Duration) -> bool {
                true
            }
        }
        let probe = Always;
        let r: &Always = &probe;
        assert!(r.is_reachable("example.invalid", 1, TIMEOUT));
    }
}
