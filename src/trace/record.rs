//! Trace record type and its text encoding.

use std::fmt;

/// Direction of a traced memory access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessKind {
    Read,
    Write,
}

/// One traced memory access.
///
/// Text form is `is_read address ins_delta`: `is_read` is `0` for a write
/// and any other integer for a read, `ins_delta` is the number of
/// instructions retired since the previous record.
///
/// # Example
/// ```
/// use epochsim::trace::{AccessKind, TraceRecord};
///
/// let record = TraceRecord::parse("0 4096 12").unwrap();
/// assert_eq!(record.kind, AccessKind::Write);
/// assert_eq!(record.address, 4096);
/// assert_eq!(record.ins_delta, 12);
/// assert_eq!(record.to_string(), "0 4096 12");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceRecord {
    pub kind: AccessKind,
    pub address: u64,
    pub ins_delta: u64,
}

impl TraceRecord {
    /// A write to `address`, `ins_delta` instructions after the previous record.
    pub fn write(address: u64, ins_delta: u64) -> Self {
        Self {
            kind: AccessKind::Write,
            address,
            ins_delta,
        }
    }

    /// A read of `address`, `ins_delta` instructions after the previous record.
    pub fn read(address: u64, ins_delta: u64) -> Self {
        Self {
            kind: AccessKind::Read,
            address,
            ins_delta,
        }
    }

    /// True for writes.
    #[inline]
    pub fn is_write(&self) -> bool {
        self.kind == AccessKind::Write
    }

    /// Parse one whitespace-separated text record.
    ///
    /// Returns a human-readable reason on failure; the reader attaches the
    /// line number.
    pub fn parse(line: &str) -> std::result::Result<Self, String> {
        let mut fields = line.split_whitespace();
        let (Some(is_read), Some(address), Some(ins_delta), None) =
            (fields.next(), fields.next(), fields.next(), fields.next())
        else {
            let count = line.split_whitespace().count();
            return Err(format!("expected 3 fields, found {}", count));
        };

        let is_read: i64 = is_read
            .parse()
            .map_err(|e| format!("bad direction {:?}: {}", is_read, e))?;
        let address: u64 = address
            .parse()
            .map_err(|e| format!("bad address {:?}: {}", address, e))?;
        let ins_delta: u64 = ins_delta
            .parse()
            .map_err(|e| format!("bad instruction delta {:?}: {}", ins_delta, e))?;

        let kind = if is_read == 0 {
            AccessKind::Write
        } else {
            AccessKind::Read
        };
        Ok(Self {
            kind,
            address,
            ins_delta,
        })
    }

    /// Fixed-width encoding fed to the trace digest.
    pub(crate) fn digest_bytes(&self) -> [u8; 17] {
        let mut bytes = [0u8; 17];
        bytes[0] = match self.kind {
            AccessKind::Read => 1,
            AccessKind::Write => 0,
        };
        bytes[1..9].copy_from_slice(&self.address.to_le_bytes());
        bytes[9..17].copy_from_slice(&self.ins_delta.to_le_bytes());
        bytes
    }
}

impl fmt::Display for TraceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let is_read = match self.kind {
            AccessKind::Read => 1,
            AccessKind::Write => 0,
        };
        write!(f, "{} {} {}", is_read, self.address, self.ins_delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_write_and_read() {
        assert_eq!(TraceRecord::parse("0 100 5").unwrap(), TraceRecord::write(100, 5));
        assert_eq!(TraceRecord::parse("1 100 5").unwrap(), TraceRecord::read(100, 5));
        // Any non-zero direction is a read
        assert!(!TraceRecord::parse("7 100 5").unwrap().is_write());
    }

    #[test]
    fn test_parse_tolerates_extra_whitespace() {
        let record = TraceRecord::parse("  0\t140737488355328   3 ").unwrap();
        assert_eq!(record.address, 140737488355328);
        assert_eq!(record.ins_delta, 3);
    }

    #[test]
    fn test_parse_wrong_field_count() {
        let err = TraceRecord::parse("0 100").unwrap_err();
        assert_eq!(err, "expected 3 fields, found 2");

        let err = TraceRecord::parse("0 100 5 9").unwrap_err();
        assert_eq!(err, "expected 3 fields, found 4");
    }

    #[test]
    fn test_parse_bad_numbers() {
        assert!(TraceRecord::parse("x 100 5").unwrap_err().contains("direction"));
        assert!(TraceRecord::parse("0 0x10 5").unwrap_err().contains("address"));
        assert!(TraceRecord::parse("0 100 -5").unwrap_err().contains("delta"));
    }

    #[test]
    fn test_digest_bytes_distinguish_kind() {
        assert_ne!(
            TraceRecord::write(1, 2).digest_bytes(),
            TraceRecord::read(1, 2).digest_bytes()
        );
    }

    #[test]
    fn test_display_matches_parse() {
        let record = TraceRecord::read(u64::MAX, 0);
        assert_eq!(TraceRecord::parse(&record.to_string()).unwrap(), record);
    }
}
