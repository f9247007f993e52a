//! Inbound adapters translating transport requests onto the driving ports.

pub mod http;
