//! Capability bitmask codec.
//!
//! A capability bitmask is a byte string read as one unsigned integer, most
//! significant byte first. Bit `n` set means the enumeration member with wire
//! value `n` is present. The integer is never materialised, so masks of any
//! length decode without overflow.

use serde::Serialize;

/// An enumeration that can appear in a capability bitmask.
pub trait BitFlag: Copy + Sized + 'static {
    /// All named members in declaration order.
    fn members() -> &'static [Self];

    /// Bit position of this member.
    fn bit(self) -> u8;
}

/// Whether bit `bit` is set in `bytes` read most significant byte first.
pub fn bit_is_set(bytes: &[u8], bit: u8) -> bool {
    let byte_from_end = usize::from(bit / 8);
    if byte_from_end >= bytes.len() {
        return false;
    }
    bytes[bytes.len() - 1 - byte_from_end] & (1 << (bit % 8)) != 0
}

/// Decode a capability bitmask into the members it names.
///
/// Members come back in the enumeration's declared order, not bit order.
/// Set bits with no named member are ignored.
pub fn decode_bitmask<E: BitFlag>(bytes: &[u8]) -> Vec<E> {
    E::members()
        .iter()
        .copied()
        .filter(|member| bit_is_set(bytes, member.bit()))
        .collect()
}

/// A decoded bitmask.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bitmask<E> {
    members: Vec<E>,
}

impl<E: BitFlag + PartialEq> Bitmask<E> {
    /// Decode from wire bytes.
    pub fn decode(bytes: &[u8]) -> Self {
        Bitmask {
            members: decode_bitmask(bytes),
        }
    }

    /// Whether `member` is present.
    pub fn contains(&self, member: E) -> bool {
        self.members.contains(&member)
    }

    /// Present members in declared order.
    pub fn members(&self) -> &[E] {
        &self.members
    }

    /// Number of present members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// No member present.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl<E> IntoIterator for Bitmask<E> {
    type Item = E;
    type IntoIter = std::vec::IntoIter<E>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.into_iter()
    }
}
