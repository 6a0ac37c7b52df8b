//! Single-shot diagnostic query against a nameserver.

use std::future::Future;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::{Duration, Instant};

use hickory_proto::op::{Message, MessageType, OpCode, Query};
use hickory_proto::rr::{DNSClass, Name, RecordType};
use tokio::net::UdpSocket;

use crate::config::WatchdogConfig;
use crate::error::{Result, WatchdogError};

/// Large enough for any UDP response a CHAOS query gets back.
const RECV_BUFFER_SIZE: usize = 4096;

/// A completed round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    /// Time from sending the query to receiving the response.
    pub rtt: Duration,
    /// First answer record, or a note that there was none.
    pub summary: String,
}

/// One round trip to a nameserver.
///
/// Implementations must not retry: the watchdog's poll cadence is the only
/// retry policy.
pub trait Probe {
    /// Queries `addr` once. Any failure to complete the round trip is an
    /// error, whatever the cause.
    fn probe(&mut self, addr: &str) -> impl Future<Output = Result<Exchange>>;
}

/// Sends a CHAOS/TXT query (e.g. `hostname.bind.`) over UDP.
#[derive(Debug, Clone)]
pub struct UdpProbe {
    name: Name,
    timeout: Duration,
}

impl UdpProbe {
    /// Creates a probe asking for `name` with the given timeout.
    ///
    /// # Errors
    ///
    /// Returns [`WatchdogError::InvalidConfig`] if `name` is not a valid
    /// domain name.
    pub fn new(name: &str, timeout: Duration) -> Result<Self> {
        let name = Name::from_ascii(name)
            .map_err(|e| WatchdogError::InvalidConfig(format!("query name {name:?}: {e}")))?;
        Ok(Self { name, timeout })
    }

    /// Creates a probe from the query name and timeout in `config`.
    ///
    /// # Errors
    ///
    /// See [`UdpProbe::new`].
    pub fn from_config(config: &WatchdogConfig) -> Result<Self> {
        Self::new(&config.query_name, config.query_timeout)
    }

    /// The name being queried.
    #[must_use]
    pub const fn name(&self) -> &Name {
        &self.name
    }

    async fn exchange(&self, addr: &str) -> Result<Exchange> {
        let target = tokio::net::lookup_host(addr)
            .await?
            .next()
            .ok_or_else(|| WatchdogError::Resolve {
                addr: addr.to_string(),
            })?;

        let socket = UdpSocket::bind(unspecified_for(target)).await?;
        socket.connect(target).await?;

        let id = rand::random::<u16>();
        let query = build_query(id, &self.name).to_vec()?;

        let started = Instant::now();
        socket.send(&query).await?;

        let mut buf = vec![0u8; RECV_BUFFER_SIZE];
        let len = socket.recv(&mut buf).await?;
        let rtt = started.elapsed();

        let response = Message::from_vec(&buf[..len])?;
        if response.id() != id {
            return Err(WatchdogError::IdMismatch {
                expected: id,
                received: response.id(),
            });
        }

        Ok(Exchange {
            rtt,
            summary: summarize(&response),
        })
    }
}

impl Probe for UdpProbe {
    async fn probe(&mut self, addr: &str) -> Result<Exchange> {
        tokio::time::timeout(self.timeout, self.exchange(addr))
            .await
            .map_err(|_| WatchdogError::Timeout(self.timeout))?
    }
}

/// Builds a recursion-desired CHAOS/TXT query for `name`.
#[must_use]
pub fn build_query(id: u16, name: &Name) -> Message {
    let mut query = Query::query(name.clone(), RecordType::TXT);
    query.set_query_class(DNSClass::CH);

    let mut message = Message::new();
    message
        .set_id(id)
        .set_message_type(MessageType::Query)
        .set_op_code(OpCode::Query)
        .set_recursion_desired(true)
        .add_query(query);
    message
}

/// One-line description of a response for verbose logs.
#[must_use]
pub fn summarize(response: &Message) -> String {
    response.answers().first().map_or_else(
        || format!("{} with no answer records", response.response_code()),
        ToString::to_string,
    )
}

const fn unspecified_for(target: SocketAddr) -> SocketAddr {
    match target {
        SocketAddr::V4(_) => SocketAddr::new(std::net::IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0),
        SocketAddr::V6(_) => SocketAddr::new(std::net::IpAddr::V6(Ipv6Addr::UNSPECIFIED), 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hickory_proto::op::ResponseCode;
    use hickory_proto::rr::rdata::TXT;
    use hickory_proto::rr::{RData, Record};

    #[test]
    fn query_is_chaos_txt() {
        let name = Name::from_ascii("hostname.bind.").unwrap();
        let msg = build_query(42, &name);
        assert_eq!(msg.id(), 42);
        assert_eq!(msg.message_type(), MessageType::Query);
        assert!(msg.recursion_desired());

        let q = &msg.queries()[0];
        assert_eq!(q.name(), &name);
        assert_eq!(q.query_type(), RecordType::TXT);
        assert_eq!(q.query_class(), DNSClass::CH);
    }

    #[test]
    fn invalid_name_is_a_config_error() {
        let too_long = format!("{}.bind.", "x".repeat(64));
        let err = UdpProbe::new(&too_long, Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, WatchdogError::InvalidConfig(_)));
    }

    #[test]
    fn config_supplies_name_and_timeout() {
        let config = WatchdogConfig::default().with_query_name("version.bind.");
        let probe = UdpProbe::from_config(&config).unwrap();
        assert_eq!(probe.name().to_ascii(), "version.bind.");
        assert_eq!(probe.timeout, Duration::from_secs(2));
    }

    #[test]
    fn summary_prefers_first_answer() {
        let name = Name::from_ascii("hostname.bind.").unwrap();
        let mut response = build_query(1, &name);
        response.set_message_type(MessageType::Response);
        assert!(summarize(&response).contains("no answer records"));

        let mut record = Record::from_rdata(
            name,
            0,
            RData::TXT(TXT::new(vec!["ns1.example".to_string()])),
        );
        record.set_dns_class(DNSClass::CH);
        response.add_answer(record);
        response.set_response_code(ResponseCode::NoError);
        assert!(summarize(&response).contains("ns1.example"));
    }

    #[test]
    fn unspecified_matches_family() {
        let v4: SocketAddr = "192.0.2.1:53".parse().unwrap();
        let v6: SocketAddr = "[2001:db8::1]:53".parse().unwrap();
        assert!(unspecified_for(v4).is_ipv4());
        assert!(unspecified_for(v6).is_ipv6());
        assert_eq!(unspecified_for(v6).port(), 0);
    }
}
