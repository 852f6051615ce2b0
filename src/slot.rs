use std::{
  alloc::Layout,
  mem::ManuallyDrop,
  ptr::{self, NonNull},
};

/// One unit of pool storage.
///
/// A slot is either raw storage for a live `T` (handed to the caller) or a
/// link in the free list (owned by the pool). The pool only ever touches the
/// `next` field, and only while the slot sits on the free list.
#[repr(C)]
pub(crate) union Slot<T> {
  /// Never read: callers reach the element through the slot pointer cast to
  /// `*mut T`. The field only sizes and aligns the slot for `T`.
  #[allow(dead_code)]
  element: ManuallyDrop<T>,
  next: Option<NonNull<Slot<T>>>,
}

impl<T> Slot<T> {
  pub const LAYOUT: Layout = Layout::new::<Self>();
  pub const SIZE: usize = Self::LAYOUT.size();
}

/// LIFO stack of freed slots, linked through the slots' own storage.
pub(crate) struct FreeList<T> {
  head: Option<NonNull<Slot<T>>>,
  len: usize,
}

impl<T> FreeList<T> {
  pub const fn new() -> Self {
    Self { head: None, len: 0 }
  }

  pub fn len(&self) -> usize {
    self.len
  }

  /// Pushes `slot` as the new head.
  ///
  /// # Safety
  ///
  /// `slot` must point at a slot of this pool that holds no live element and
  /// is not already on the list.
  pub unsafe fn push(
    &mut self,
    slot: NonNull<Slot<T>>,
  ) {
    unsafe { (&raw mut (*slot.as_ptr()).next).write(self.head) };
    self.head = Some(slot);
    self.len += 1;
  }

  pub fn pop(&mut self) -> Option<NonNull<Slot<T>>> {
    let slot = self.head?;
    // Every slot on the list had its link written by `push`.
    self.head = unsafe { ptr::read(&raw const (*slot.as_ptr()).next) };
    self.len -= 1;
    Some(slot)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::mem;

  #[test]
  fn test_slot_layout_covers_element_and_link() {
    assert!(Slot::<u8>::SIZE >= mem::size_of::<usize>());
    assert!(Slot::<[u64; 4]>::SIZE >= 32);
    assert_eq!(Slot::<u128>::LAYOUT.align(), mem::align_of::<u128>().max(mem::align_of::<usize>()));
    assert!(Slot::<()>::SIZE > 0);
  }

  #[test]
  fn test_free_list_is_lifo() {
    let mut storage: Vec<Slot<u64>> = (0..3).map(|_| Slot { next: None }).collect();
    let slots: Vec<_> = storage.iter_mut().map(NonNull::from).collect();

    let mut list = FreeList::new();
    assert!(list.pop().is_none());

    unsafe {
      for &slot in &slots {
        list.push(slot);
      }
    }
    assert_eq!(list.len(), 3);

    assert_eq!(list.pop(), Some(slots[2]));
    assert_eq!(list.pop(), Some(slots[1]));

    unsafe { list.push(slots[2]) };
    assert_eq!(list.pop(), Some(slots[2]));
    assert_eq!(list.pop(), Some(slots[0]));
    assert!(list.pop().is_none());
    assert_eq!(list.len(), 0);
  }
}
