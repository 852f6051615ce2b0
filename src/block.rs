use std::{
  alloc::Layout,
  mem,
  ptr::{self, NonNull},
};

use libc::c_void;
use tracing::{debug, trace};

use crate::{align::padding_for, align_up, error::PoolError};

/// First word of every block: the link to the block acquired before it.
#[repr(C)]
pub(crate) struct BlockHeader {
  prev: Option<NonNull<BlockHeader>>,
}

/// Fixed shape shared by every block of one pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BlockGeometry {
  layout: Layout,
  slot_size: usize,
  slot_align: usize,
  slots_per_block: usize,
}

impl BlockGeometry {
  /// Lays out a block of `header | padding | block_size bytes of slots`.
  pub fn new(
    slot: Layout,
    block_size: usize,
  ) -> Result<Self, PoolError> {
    let too_small = PoolError::BlockTooSmall {
      block_size,
      slot_size: slot.size(),
    };
    match slot.size().checked_mul(2) {
      Some(min) if block_size >= min => {}
      _ => return Err(too_small),
    }

    let align = slot.align().max(mem::align_of::<BlockHeader>());
    let overflow = PoolError::LayoutOverflow { block_size, align };

    // Blocks are requested at `align`, so the padding behind the header is
    // the same for every block.
    let body = align_up!(mem::size_of::<BlockHeader>(), align);
    let total = body.checked_add(block_size).ok_or(overflow)?;
    let layout = Layout::from_size_align(total, align).map_err(|_| overflow)?;

    Ok(Self {
      layout,
      slot_size: slot.size(),
      slot_align: slot.align(),
      slots_per_block: block_size / slot.size(),
    })
  }

  pub fn layout(&self) -> Layout {
    self.layout
  }

  pub fn slot_size(&self) -> usize {
    self.slot_size
  }

  pub fn slots_per_block(&self) -> usize {
    self.slots_per_block
  }
}

/// The slot region of a freshly acquired block: `[first, end)`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SlotRegion {
  pub first: NonNull<u8>,
  pub end: NonNull<u8>,
}

/// Newest-first chain of every block a pool owns.
///
/// Blocks are never released individually; dropping the chain frees them
/// all in one walk.
pub(crate) struct BlockChain {
  head: Option<NonNull<BlockHeader>>,
  len: usize,
}

impl BlockChain {
  pub const fn new() -> Self {
    Self { head: None, len: 0 }
  }

  pub fn len(&self) -> usize {
    self.len
  }

  /// Acquires one block from the system allocator, links it at the front of
  /// the chain and returns its slot region.
  pub fn acquire(
    &mut self,
    geometry: &BlockGeometry,
  ) -> Result<SlotRegion, PoolError> {
    let layout = geometry.layout;
    let raw = system_alloc(layout).ok_or(PoolError::OutOfMemory {
      size: layout.size(),
      align: layout.align(),
    })?;

    let header = raw.cast::<BlockHeader>();
    unsafe { header.as_ptr().write(BlockHeader { prev: self.head }) };
    self.head = Some(header);
    self.len += 1;

    // The region stays inside the `layout.size()` bytes that were just
    // handed out: padding here equals the padding `BlockGeometry` reserved.
    let region = unsafe {
      let body = raw.add(mem::size_of::<BlockHeader>());
      let first = body.add(padding_for(body.addr().get(), geometry.slot_align));
      let end = first.add(geometry.slots_per_block * geometry.slot_size);
      SlotRegion { first, end }
    };

    trace!(
      block = ?raw,
      blocks = self.len,
      slots = geometry.slots_per_block,
      "acquired pool block"
    );

    Ok(region)
  }

  fn release_all(&mut self) {
    let released = self.len;
    let mut current = self.head.take();

    while let Some(block) = current {
      unsafe {
        current = (*block.as_ptr()).prev;
        libc::free(block.as_ptr().cast::<c_void>());
      }
    }
    self.len = 0;

    if released > 0 {
      debug!(blocks = released, "released pool blocks");
    }
  }
}

impl Drop for BlockChain {
  fn drop(&mut self) {
    self.release_all();
  }
}

/// Requests `layout` from the C allocator. Memory is returned with `free`.
fn system_alloc(layout: Layout) -> Option<NonNull<u8>> {
  // posix_memalign wants a power of two that is also a multiple of the
  // pointer width.
  let align = layout.align().max(mem::size_of::<*mut c_void>());
  let mut raw: *mut c_void = ptr::null_mut();

  let rc = unsafe { libc::posix_memalign(&mut raw, align, layout.size()) };
  if rc != 0 {
    return None;
  }

  NonNull::new(raw.cast::<u8>())
}
