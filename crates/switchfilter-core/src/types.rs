//! Core types for the SwitchFilter policy module.
//!
//! These are the values the host controller hands to the filter: switch
//! identities, control messages, and the port descriptors that accompany
//! lifecycle events. The filter reads them and never owns the switches they
//! describe.

use crate::error::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Port number on a managed switch.
pub type PortNumber = u16;

/// Stable 64-bit identifier of a managed switch.
///
/// The canonical rendering is eight two-digit lowercase hex octets joined by
/// colons, which is the text the filter rules are matched against.
///
/// # Examples
///
/// ```
/// use switchfilter_core::types::DatapathId;
///
/// let dpid = DatapathId::new(1);
/// assert_eq!(dpid.to_string(), "00:00:00:00:00:00:00:01");
///
/// let parsed: DatapathId = "0000000000000001".parse().unwrap();
/// assert_eq!(parsed, dpid);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DatapathId(u64);

impl DatapathId {
    /// Creates a datapath id from its raw value.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw 64-bit value.
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for DatapathId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = self.0.to_be_bytes();
        for (i, byte) in bytes.iter().enumerate() {
            if i > 0 {
                f.write_str(":")?;
            }
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl FromStr for DatapathId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseError::invalid_dpid(s, "empty identifier"));
        }

        if s.contains(':') {
            let octets: Vec<&str> = s.split(':').collect();
            if octets.len() > 8 {
                return Err(ParseError::invalid_dpid(s, "more than 8 octets"));
            }
            let mut raw = 0u64;
            for octet in octets {
                if octet.is_empty() || octet.len() > 2 || !is_hex_digits(octet) {
                    return Err(ParseError::invalid_dpid(s, "octets must be 1 or 2 hex digits"));
                }
                let value = u8::from_str_radix(octet, 16)
                    .map_err(|e| ParseError::invalid_dpid(s, e.to_string()))?;
                raw = (raw << 8) | u64::from(value);
            }
            return Ok(Self(raw));
        }

        if s.len() > 16 {
            return Err(ParseError::invalid_dpid(s, "more than 16 hex digits"));
        }
        if !is_hex_digits(s) {
            return Err(ParseError::invalid_dpid(s, "expected hex digits only"));
        }
        u64::from_str_radix(s, 16)
            .map(Self)
            .map_err(|e| ParseError::invalid_dpid(s, e.to_string()))
    }
}

/// `from_str_radix` tolerates a leading sign, so digits are checked first.
fn is_hex_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_hexdigit())
}

impl From<u64> for DatapathId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl From<DatapathId> for u64 {
    fn from(dpid: DatapathId) -> Self {
        dpid.0
    }
}

/// A switch's identifier together with its textual rendering.
///
/// Owned by the host; the filter only reads it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SwitchIdentity {
    dpid: DatapathId,
    string_id: String,
}

impl SwitchIdentity {
    /// Creates an identity using the canonical colon-hex rendering.
    pub fn new(dpid: DatapathId) -> Self {
        Self {
            dpid,
            string_id: dpid.to_string(),
        }
    }

    /// Creates an identity with a host-supplied rendering.
    ///
    /// Hosts that print identifiers differently (plain hex, vendor names)
    /// pass their own string; rules are matched against it verbatim.
    pub fn with_string_id(dpid: DatapathId, string_id: impl Into<String>) -> Self {
        Self {
            dpid,
            string_id: string_id.into(),
        }
    }

    /// Returns the datapath id.
    pub fn dpid(&self) -> DatapathId {
        self.dpid
    }

    /// Returns the textual identifier rules are matched against.
    pub fn string_id(&self) -> &str {
        &self.string_id
    }
}

impl fmt::Display for SwitchIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.string_id)
    }
}

impl From<DatapathId> for SwitchIdentity {
    fn from(dpid: DatapathId) -> Self {
        Self::new(dpid)
    }
}

/// Control-plane message kinds (OpenFlow 1.0 numbering).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageType {
    Hello,
    Error,
    EchoRequest,
    EchoReply,
    Vendor,
    FeaturesRequest,
    FeaturesReply,
    GetConfigRequest,
    GetConfigReply,
    SetConfig,
    PacketIn,
    FlowRemoved,
    PortStatus,
    PacketOut,
    FlowMod,
    PortMod,
    StatsRequest,
    StatsReply,
    BarrierRequest,
    BarrierReply,
    QueueGetConfigRequest,
    QueueGetConfigReply,
    /// Raw type code. [`MessageType::from_code`] only produces this for
    /// codes without a named variant; use [`MessageType::canonical`] to fold
    /// hand-built values back onto the named kinds.
    Other(u8),
}

impl MessageType {
    /// Maps an OpenFlow 1.0 type code to a message kind.
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => MessageType::Hello,
            1 => MessageType::Error,
            2 => MessageType::EchoRequest,
            3 => MessageType::EchoReply,
            4 => MessageType::Vendor,
            5 => MessageType::FeaturesRequest,
            6 => MessageType::FeaturesReply,
            7 => MessageType::GetConfigRequest,
            8 => MessageType::GetConfigReply,
            9 => MessageType::SetConfig,
            10 => MessageType::PacketIn,
            11 => MessageType::FlowRemoved,
            12 => MessageType::PortStatus,
            13 => MessageType::PacketOut,
            14 => MessageType::FlowMod,
            15 => MessageType::PortMod,
            16 => MessageType::StatsRequest,
            17 => MessageType::StatsReply,
            18 => MessageType::BarrierRequest,
            19 => MessageType::BarrierReply,
            20 => MessageType::QueueGetConfigRequest,
            21 => MessageType::QueueGetConfigReply,
            other => MessageType::Other(other),
        }
    }

    /// Folds `Other(code)` onto the named variant for that code, if any.
    pub fn canonical(self) -> Self {
        Self::from_code(self.code())
    }

    /// Returns the OpenFlow 1.0 type code.
    pub fn code(&self) -> u8 {
        match self {
            MessageType::Hello => 0,
            MessageType::Error => 1,
            MessageType::EchoRequest => 2,
            MessageType::EchoReply => 3,
            MessageType::Vendor => 4,
            MessageType::FeaturesRequest => 5,
            MessageType::FeaturesReply => 6,
            MessageType::GetConfigRequest => 7,
            MessageType::GetConfigReply => 8,
            MessageType::SetConfig => 9,
            MessageType::PacketIn => 10,
            MessageType::FlowRemoved => 11,
            MessageType::PortStatus => 12,
            MessageType::PacketOut => 13,
            MessageType::FlowMod => 14,
            MessageType::PortMod => 15,
            MessageType::StatsRequest => 16,
            MessageType::StatsReply => 17,
            MessageType::BarrierRequest => 18,
            MessageType::BarrierReply => 19,
            MessageType::QueueGetConfigRequest => 20,
            MessageType::QueueGetConfigReply => 21,
            MessageType::Other(code) => *code,
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MessageType::Hello => "HELLO",
            MessageType::Error => "ERROR",
            MessageType::EchoRequest => "ECHO_REQUEST",
            MessageType::EchoReply => "ECHO_REPLY",
            MessageType::Vendor => "VENDOR",
            MessageType::FeaturesRequest => "FEATURES_REQUEST",
            MessageType::FeaturesReply => "FEATURES_REPLY",
            MessageType::GetConfigRequest => "GET_CONFIG_REQUEST",
            MessageType::GetConfigReply => "GET_CONFIG_REPLY",
            MessageType::SetConfig => "SET_CONFIG",
            MessageType::PacketIn => "PACKET_IN",
            MessageType::FlowRemoved => "FLOW_REMOVED",
            MessageType::PortStatus => "PORT_STATUS",
            MessageType::PacketOut => "PACKET_OUT",
            MessageType::FlowMod => "FLOW_MOD",
            MessageType::PortMod => "PORT_MOD",
            MessageType::StatsRequest => "STATS_REQUEST",
            MessageType::StatsReply => "STATS_REPLY",
            MessageType::BarrierRequest => "BARRIER_REQUEST",
            MessageType::BarrierReply => "BARRIER_REPLY",
            MessageType::QueueGetConfigRequest => "QUEUE_GET_CONFIG_REQUEST",
            MessageType::QueueGetConfigReply => "QUEUE_GET_CONFIG_REPLY",
            MessageType::Other(code) => return write!(f, "UNKNOWN({})", code),
        };
        f.write_str(name)
    }
}

/// An inbound control message tagged with the switch it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlMessage {
    /// Message kind
    pub kind: MessageType,
    /// Transaction id, carried for diagnostics
    pub xid: u32,
    /// Originating (or, for PACKET_OUT, destination) switch
    pub switch: SwitchIdentity,
}

impl ControlMessage {
    /// Creates a new control message.
    pub fn new(kind: MessageType, xid: u32, switch: SwitchIdentity) -> Self {
        Self { kind, xid, switch }
    }
}

impl fmt::Display for ControlMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(xid={}, switch={})", self.kind, self.xid, self.switch)
    }
}

/// Verdict returned to the host dispatch loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    /// Hand the message to the next listener
    Continue,
    /// Halt further processing of the message
    Stop,
}

impl Command {
    /// Returns true for `Command::Stop`.
    #[inline]
    pub fn is_stop(&self) -> bool {
        matches!(self, Command::Stop)
    }

    /// Returns true for `Command::Continue`.
    #[inline]
    pub fn is_continue(&self) -> bool {
        matches!(self, Command::Continue)
    }
}

/// Kind of change reported by a port-changed lifecycle event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortChangeType {
    Add,
    OtherUpdate,
    Delete,
    Up,
    Down,
}

/// Port descriptor carried by a port-changed lifecycle event.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SwitchPort {
    /// Port number
    pub number: PortNumber,
    /// Interface name reported by the switch
    pub name: String,
}

impl SwitchPort {
    /// Creates a new port descriptor.
    pub fn new(number: PortNumber, name: impl Into<String>) -> Self {
        Self {
            number,
            name: name.into(),
        }
    }
}
