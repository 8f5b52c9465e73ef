//! In-memory byte sources.
//!
//! [`SharedMemory`] is a cloneable handle to a simulated target: a byte image
//! at a base address plus a target status. Blocks read through the handle,
//! so the owner can poke memory, change the status or inject read failures
//! while a tracker holds the block.

use super::{ExtendedMemoryBlock, SimpleMemoryBlock, TargetStatus};
use crate::error::SourceError;
use crate::memory::{Address, MemoryByte};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone)]
enum Failure {
    /// Reads fail with an error.
    Error(String),
    /// Reads return no content.
    Nothing,
}

#[derive(Debug)]
struct MemoryState {
    base: u64,
    data: Vec<u8>,
    status: TargetStatus,
    failure: Option<Failure>,
    /// Values as of the last `commit`, for sources that track changes.
    committed: Option<Vec<u8>>,
    reads: usize,
}

/// Handle to a simulated target memory image.
#[derive(Debug, Clone)]
pub struct SharedMemory {
    state: Rc<RefCell<MemoryState>>,
}

impl SharedMemory {
    /// Create an image of `data` placed at `base`.
    pub fn new(base: u64, data: Vec<u8>) -> Self {
        Self {
            state: Rc::new(RefCell::new(MemoryState {
                base,
                data,
                status: TargetStatus::Suspended,
                failure: None,
                committed: None,
                reads: 0,
            })),
        }
    }

    /// Base address of the image.
    pub fn base(&self) -> u64 {
        self.state.borrow().base
    }

    /// Image length in bytes.
    pub fn len(&self) -> usize {
        self.state.borrow().data.len()
    }

    /// Check if the image is empty.
    pub fn is_empty(&self) -> bool {
        self.state.borrow().data.is_empty()
    }

    /// Overwrite bytes at an absolute address. Bytes outside the image are ignored.
    pub fn write(&self, address: u64, bytes: &[u8]) {
        let mut state = self.state.borrow_mut();
        let Some(start) = address.checked_sub(state.base) else {
            return;
        };
        let Ok(start) = usize::try_from(start) else {
            return;
        };
        let len = state.data.len();
        for (offset, value) in bytes.iter().enumerate() {
            match start.checked_add(offset) {
                Some(i) if i < len => state.data[i] = *value,
                _ => break,
            }
        }
    }

    /// Copy of the whole image.
    pub fn snapshot(&self) -> Vec<u8> {
        self.state.borrow().data.clone()
    }

    /// Set the target status reported by blocks.
    pub fn set_status(&self, status: TargetStatus) {
        self.state.borrow_mut().status = status;
    }

    /// Current target status.
    pub fn status(&self) -> TargetStatus {
        self.state.borrow().status
    }

    /// Make every subsequent read fail with `message`.
    pub fn fail_with(&self, message: impl Into<String>) {
        self.state.borrow_mut().failure = Some(Failure::Error(message.into()));
    }

    /// Make every subsequent read return no content.
    pub fn fail_with_nothing(&self) {
        self.state.borrow_mut().failure = Some(Failure::Nothing);
    }

    /// Stop injecting failures.
    pub fn clear_failure(&self) {
        self.state.borrow_mut().failure = None;
    }

    /// Record the current image as the baseline for change tracking.
    pub fn commit(&self) {
        let mut state = self.state.borrow_mut();
        state.committed = Some(state.data.clone());
    }

    /// Number of reads served so far (including failed ones).
    pub fn read_count(&self) -> usize {
        self.state.borrow().reads
    }

    fn begin_read(&self) -> Result<bool, SourceError> {
        let mut state = self.state.borrow_mut();
        state.reads += 1;
        match &state.failure {
            Some(Failure::Error(message)) => Err(SourceError::new(message.clone())),
            Some(Failure::Nothing) => Ok(false),
            None => Ok(true),
        }
    }
}

/// Simple block over a [`SharedMemory`] image.
#[derive(Debug, Clone)]
pub struct InMemoryBlock {
    memory: SharedMemory,
}

impl InMemoryBlock {
    /// Create a block covering the whole image.
    pub const fn new(memory: SharedMemory) -> Self {
        Self { memory }
    }
}

impl SimpleMemoryBlock for InMemoryBlock {
    fn start_address(&self) -> u64 {
        self.memory.base()
    }

    fn length(&self) -> u64 {
        self.memory.len() as u64
    }

    fn bytes(&mut self) -> Result<Option<Vec<u8>>, SourceError> {
        if !self.memory.begin_read()? {
            return Ok(None);
        }
        Ok(Some(self.memory.snapshot()))
    }

    fn target_status(&self) -> TargetStatus {
        self.memory.status()
    }
}

/// Extended block over a [`SharedMemory`] image.
///
/// Addresses below the image read as placeholders; reads stop at the end of
/// the image, producing a short result.
#[derive(Debug, Clone)]
pub struct InMemoryExtendedBlock {
    memory: SharedMemory,
    address_size: usize,
    addressable_size: usize,
    change_managed: bool,
}

impl InMemoryExtendedBlock {
    /// Create a block with an undeclared address size and byte addressing.
    pub const fn new(memory: SharedMemory) -> Self {
        Self {
            memory,
            address_size: 0,
            addressable_size: 1,
            change_managed: false,
        }
    }

    /// Declare the address size in bytes (builder pattern).
    #[must_use]
    pub const fn with_address_size(mut self, size: usize) -> Self {
        self.address_size = size;
        self
    }

    /// Set the addressable unit size in bytes (builder pattern).
    #[must_use]
    pub const fn with_addressable_size(mut self, size: usize) -> Self {
        self.addressable_size = size;
        self
    }

    /// Let the block flag changes against the last `commit` (builder pattern).
    #[must_use]
    pub const fn with_change_management(mut self, enabled: bool) -> Self {
        self.change_managed = enabled;
        self
    }
}

impl ExtendedMemoryBlock for InMemoryExtendedBlock {
    fn base_address(&self) -> Address {
        Address::from(self.memory.base())
    }

    fn address_size(&self) -> usize {
        self.address_size
    }

    fn addressable_size(&self) -> usize {
        self.addressable_size
    }

    fn supports_change_management(&self) -> bool {
        self.change_managed
    }

    fn bytes_from_address(
        &mut self,
        start: &Address,
        units: u64,
    ) -> Result<Option<Vec<MemoryByte>>, SourceError> {
        if !self.memory.begin_read()? {
            return Ok(None);
        }

        let Some(start) = start.to_u64() else {
            return Ok(Some(Vec::new()));
        };

        let state = self.memory.state.borrow();
        let unit = self.addressable_size.max(1);
        let capacity = usize::try_from(units).unwrap_or(0).saturating_mul(unit);
        let mut out = Vec::with_capacity(capacity.min(state.data.len()));
        let base = u128::from(state.base);

        'units: for u in 0..units {
            let address = u128::from(start) + u128::from(u);
            if address < base {
                out.extend(std::iter::repeat(MemoryByte::PLACEHOLDER).take(unit));
                continue;
            }
            let Ok(first) = usize::try_from(address - base) else {
                break;
            };
            for offset in first * unit..(first + 1) * unit {
                let Some(&value) = state.data.get(offset) else {
                    break 'units;
                };
                let mut byte = MemoryByte::valid(value);
                if self.change_managed {
                    if let Some(previous) = state.committed.as_ref().and_then(|c| c.get(offset)) {
                        byte.mark_changed(*previous != value);
                    }
                }
                out.push(byte);
            }
        }

        Ok(Some(out))
    }

    fn target_status(&self) -> TargetStatus {
        self.memory.status()
    }
}
