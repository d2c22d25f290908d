//! Mock transport backend
//!
//! In-process stand-in for a real Dynamixel SDK port. Holds a device-side
//! register table image, applies writes to it, and records every write
//! transaction so tests can assert call counts and payloads. Failure
//! injection flags simulate an unplugged or faulty link.

use crate::{BulkReadEntry, DxlTransport, SyncWriteEntry, TransportError};
use opencr_protocol::CONTROL_TABLE_SIZE;

/// One recorded write transaction (either `write` or one `sync_write` entry).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteRecord {
    pub id: u8,
    pub address: u16,
    pub data: Vec<u8>,
}

/// Mock transport over an in-memory register table.
pub struct MockTransport {
    /// Device-side control table image.
    table: Vec<u8>,
    /// Every accepted write, in order.
    writes: Vec<WriteRecord>,
    opened: bool,
    baud: Option<u32>,
    /// Model number returned by `ping`; `None` simulates no response.
    ping_model: Option<u16>,
    /// Failure injection.
    pub fail_open: bool,
    pub fail_reads: bool,
    pub fail_writes: bool,
    /// Fail every write once this many have been accepted.
    pub fail_writes_after: Option<usize>,
}

impl MockTransport {
    /// Create a mock with a zero-filled table of `CONTROL_TABLE_SIZE` bytes.
    pub fn new() -> Self {
        Self::with_table(vec![0; CONTROL_TABLE_SIZE])
    }

    /// Create a mock over an explicit device-side table image.
    pub fn with_table(table: Vec<u8>) -> Self {
        Self {
            table,
            writes: Vec::new(),
            opened: false,
            baud: None,
            ping_model: None,
            fail_open: false,
            fail_reads: false,
            fail_writes: false,
            fail_writes_after: None,
        }
    }

    /// Preload device-side register bytes (simulates firmware state).
    pub fn set_bytes(&mut self, address: u16, data: &[u8]) {
        let start = address as usize;
        self.table[start..start + data.len()].copy_from_slice(data);
    }

    /// Current device-side table image.
    pub fn table(&self) -> &[u8] {
        &self.table
    }

    /// All recorded writes, oldest first.
    pub fn writes(&self) -> &[WriteRecord] {
        &self.writes
    }

    pub fn clear_writes(&mut self) {
        self.writes.clear();
    }

    /// Set the model number `ping` responds with.
    pub fn respond_to_ping(&mut self, model: u16) {
        self.ping_model = Some(model);
    }

    pub fn baud(&self) -> Option<u32> {
        self.baud
    }

    pub fn is_open(&self) -> bool {
        self.opened
    }

    fn ensure_open(&self) -> Result<(), TransportError> {
        if self.opened {
            Ok(())
        } else {
            Err(TransportError::NotOpen)
        }
    }

    fn write_should_fail(&self) -> bool {
        self.fail_writes
            || self
                .fail_writes_after
                .is_some_and(|limit| self.writes.len() >= limit)
    }

    fn range(&self, address: u16, length: u16) -> Result<std::ops::Range<usize>, TransportError> {
        let start = address as usize;
        let end = start + length as usize;
        if end > self.table.len() {
            return Err(TransportError::Packet(format!(
                "read/write past end of table: {}..{} (size {})",
                start,
                end,
                self.table.len()
            )));
        }
        Ok(start..end)
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl DxlTransport for MockTransport {
    fn open(&mut self, _path: &str) -> Result<(), TransportError> {
        if self.fail_open {
            return Err(TransportError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "mock port unavailable",
            )));
        }
        self.opened = true;
        Ok(())
    }

    fn set_baud_rate(&mut self, baud: u32) -> Result<(), TransportError> {
        self.ensure_open()?;
        self.baud = Some(baud);
        Ok(())
    }

    fn ping(&mut self, id: u8) -> Result<u16, TransportError> {
        self.ensure_open()?;
        self.ping_model.ok_or(TransportError::NoResponse { id })
    }

    fn read(&mut self, id: u8, address: u16, length: u16) -> Result<Vec<u8>, TransportError> {
        self.ensure_open()?;
        if self.fail_reads {
            return Err(TransportError::NoResponse { id });
        }
        let range = self.range(address, length)?;
        Ok(self.table[range].to_vec())
    }

    fn bulk_read(&mut self, entries: &[BulkReadEntry]) -> Result<Vec<u8>, TransportError> {
        self.ensure_open()?;
        let mut out = Vec::new();
        for entry in entries {
            if self.fail_reads {
                return Err(TransportError::NoResponse { id: entry.id });
            }
            let range = self.range(entry.address, entry.length)?;
            out.extend_from_slice(&self.table[range]);
        }
        Ok(out)
    }

    fn write(&mut self, id: u8, address: u16, data: &[u8]) -> Result<(), TransportError> {
        self.ensure_open()?;
        if self.write_should_fail() {
            return Err(TransportError::NoResponse { id });
        }
        let range = self.range(address, data.len() as u16)?;
        self.table[range].copy_from_slice(data);
        self.writes.push(WriteRecord {
            id,
            address,
            data: data.to_vec(),
        });
        Ok(())
    }

    fn sync_write(
        &mut self,
        address: u16,
        length: u16,
        entries: &[SyncWriteEntry],
    ) -> Result<(), TransportError> {
        self.ensure_open()?;
        if self.write_should_fail() {
            return Err(TransportError::NoResponse {
                id: entries.first().map(|e| e.id).unwrap_or(0),
            });
        }
        for entry in entries {
            if entry.data.len() != length as usize {
                return Err(TransportError::Packet(format!(
                    "sync_write entry for id {} has {} bytes, expected {}",
                    entry.id,
                    entry.data.len(),
                    length
                )));
            }
            // Single-board mock: all ids share one table image.
            let range = self.range(address, length)?;
            self.table[range].copy_from_slice(&entry.data);
            self.writes.push(WriteRecord {
                id: entry.id,
                address,
                data: entry.data.clone(),
            });
        }
        Ok(())
    }
}
