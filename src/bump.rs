use std::ptr::{self, NonNull};

use crate::block::SlotRegion;

/// Bump cursor over the current block's slot region.
///
/// `next` is the first never-issued slot and `end` the exclusive end of the
/// region; both are null until the first block is acquired. The cursor only
/// moves forward, one slot at a time, and never touches the free list.
pub(crate) struct BumpCursor {
  next: *mut u8,
  end: *mut u8,
}

impl BumpCursor {
  pub const fn empty() -> Self {
    Self {
      next: ptr::null_mut(),
      end: ptr::null_mut(),
    }
  }

  /// Issues the slot under the cursor, or `None` once the region is spent.
  pub fn bump(
    &mut self,
    slot_size: usize,
  ) -> Option<NonNull<u8>> {
    if self.end.addr().wrapping_sub(self.next.addr()) < slot_size {
      return None;
    }

    let slot = NonNull::new(self.next)?;
    // At worst this lands one past the region, still inside the block.
    self.next = unsafe { self.next.add(slot_size) };
    Some(slot)
  }

  /// Points the cursor at a fresh region and issues its first slot.
  pub fn restart(
    &mut self,
    region: SlotRegion,
    slot_size: usize,
  ) -> NonNull<u8> {
    debug_assert!(region.end.addr().get() - region.first.addr().get() >= slot_size);

    self.next = unsafe { region.first.as_ptr().add(slot_size) };
    self.end = region.end.as_ptr();
    region.first
  }

  /// Slots the current region can still issue.
  pub fn remaining(
    &self,
    slot_size: usize,
  ) -> usize {
    self.end.addr().wrapping_sub(self.next.addr()) / slot_size
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const SLOT: usize = 16;

  fn region(buffer: &mut [u8]) -> SlotRegion {
    let range = buffer.as_mut_ptr_range();
    SlotRegion {
      first: NonNull::new(range.start).unwrap(),
      end: NonNull::new(range.end).unwrap(),
    }
  }

  #[test]
  fn test_empty_cursor_is_exhausted() {
    let mut cursor = BumpCursor::empty();

    assert!(cursor.bump(SLOT).is_none());
    assert_eq!(cursor.remaining(SLOT), 0);
  }

  #[test]
  fn test_bump_issues_each_slot_once() {
    let mut buffer = [0u8; 4 * SLOT];
    let region = region(&mut buffer);
    let base = region.first.addr().get();
    let mut cursor = BumpCursor::empty();

    let first = cursor.restart(region, SLOT);
    assert_eq!(first.addr().get(), base);
    assert_eq!(cursor.remaining(SLOT), 3);

    for i in 1..4 {
      let slot = cursor.bump(SLOT).unwrap();
      assert_eq!(slot.addr().get(), base + i * SLOT);
    }

    // Exactly four slots: the fifth request must not step past the end.
    assert!(cursor.bump(SLOT).is_none());
    assert!(cursor.bump(SLOT).is_none());
    assert_eq!(cursor.remaining(SLOT), 0);
  }

  #[test]
  fn test_partial_tail_is_not_issued() {
    let mut buffer = [0u8; 2 * SLOT + SLOT / 2];
    let mut region = region(&mut buffer);
    let mut cursor = BumpCursor::empty();

    // Regions from `BlockChain` are whole slots; emulate a ragged one.
    region.end = NonNull::new(unsafe { region.first.as_ptr().add(2 * SLOT + 1) }).unwrap();

    cursor.restart(region, SLOT);
    assert!(cursor.bump(SLOT).is_some());
    assert!(cursor.bump(SLOT).is_none());
  }
}
