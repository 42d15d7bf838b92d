//! IP-subnet bucketing, grounded in `witnet_p2p::peers::split_socket_addresses`
//! (which buckets by IP octets to build its tried/new address buckets). Spec
//! §4.7 needs a coarser, fixed bucketing for the "network topology" Sybil
//! signal: validators sharing a `/24` (IPv4) or `/64` (IPv6) subnet count as
//! topologically close.

use std::net::{IpAddr, SocketAddr};

use serde::{Deserialize, Serialize};

/// A subnet bucket: the prefix bits of a peer's IP address used to detect
/// validators hosted on the same network (spec §4.7).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum SubnetKey {
    /// `/24` IPv4 prefix (top 3 octets).
    V4([u8; 3]),
    /// `/64` IPv6 prefix (top 8 octets).
    V6([u8; 8]),
}

/// Compute the subnet bucket for a peer's socket address: `/24` for IPv4,
/// `/64` for IPv6 (spec §4.7 network-topology signal).
pub fn subnet_key(addr: &SocketAddr) -> SubnetKey {
    match addr.ip() {
        IpAddr::V4(ip) => {
            let o = ip.octets();
            SubnetKey::V4([o[0], o[1], o[2]])
        }
        IpAddr::V6(ip) => {
            let o = ip.octets();
            let mut prefix = [0u8; 8];
            prefix.copy_from_slice(&o[..8]);
            SubnetKey::V6(prefix)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ipv4_addresses_in_same_24_share_a_bucket() {
        let a: SocketAddr = "10.0.0.1:8080".parse().unwrap();
        let b: SocketAddr = "10.0.0.254:9090".parse().unwrap();
        let c: SocketAddr = "10.0.1.1:8080".parse().unwrap();
        assert_eq!(subnet_key(&a), subnet_key(&b));
        assert_ne!(subnet_key(&a), subnet_key(&c));
    }

    #[test]
    fn ipv6_addresses_in_same_64_share_a_bucket() {
        let a: SocketAddr = "[2001:db8::1]:1".parse().unwrap();
        let b: SocketAddr = "[2001:db8::dead:beef]:2".parse().unwrap();
        let c: SocketAddr = "[2001:db8:1::1]:1".parse().unwrap();
        assert_eq!(subnet_key(&a), subnet_key(&b));
        assert_ne!(subnet_key(&a), subnet_key(&c));
    }
}
