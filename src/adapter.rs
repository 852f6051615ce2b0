//! Allocator capability consumed by generic containers.
//!
//! A container written against [`ObjectAllocator`] can run on a
//! [`MemoryPool`] or on the global heap ([`HeapAllocator`]) unchanged, and
//! can [`rebind`](ObjectAllocator::rebind) the allocator it was given to its
//! own node type.

use std::{
  alloc::{self, Layout},
  fmt,
  marker::PhantomData,
  ptr::{self, NonNull},
};

use crate::{error::PoolError, pool::MemoryPool};

/// Single-object allocation strategy for elements of type `Elem`.
pub trait ObjectAllocator {
  type Elem;

  /// The same strategy for a different element type.
  type Rebind<U>: ObjectAllocator<Elem = U>;

  /// Reserves uninitialized storage for one element.
  fn allocate(&mut self) -> NonNull<Self::Elem>;

  /// Releases storage from [`allocate`](Self::allocate). Null is ignored.
  ///
  /// # Safety
  ///
  /// A non-null `ptr` must come from this allocator, must not have been
  /// released already, and must not hold a live value.
  unsafe fn deallocate(
    &mut self,
    ptr: *mut Self::Elem,
  );

  /// Upper bound on the number of elements the strategy can hold.
  fn max_size(&self) -> usize;

  /// A fresh allocator for `U` that shares no state with `self`.
  fn rebind<U>(&self) -> Result<Self::Rebind<U>, PoolError>;

  /// # Safety
  ///
  /// `slot` must be allocated and must not hold a live value.
  unsafe fn construct(
    &mut self,
    slot: NonNull<Self::Elem>,
    value: Self::Elem,
  ) {
    unsafe { slot.as_ptr().write(value) };
  }

  /// # Safety
  ///
  /// `slot` must hold a live value.
  unsafe fn destroy(
    &mut self,
    slot: NonNull<Self::Elem>,
  ) {
    unsafe { ptr::drop_in_place(slot.as_ptr()) };
  }

  fn address(
    &self,
    element: &Self::Elem,
  ) -> NonNull<Self::Elem> {
    NonNull::from(element)
  }
}

impl<T> ObjectAllocator for MemoryPool<T> {
  type Elem = T;
  type Rebind<U> = MemoryPool<U>;

  fn allocate(&mut self) -> NonNull<T> {
    MemoryPool::allocate(self)
  }

  unsafe fn deallocate(
    &mut self,
    ptr: *mut T,
  ) {
    unsafe { MemoryPool::deallocate(self, ptr) };
  }

  fn max_size(&self) -> usize {
    MemoryPool::max_size(self)
  }

  fn rebind<U>(&self) -> Result<MemoryPool<U>, PoolError> {
    MemoryPool::rebind(self)
  }
}

/// One global-allocator request per element.
pub struct HeapAllocator<T> {
  _marker: PhantomData<fn() -> T>,
}

impl<T> HeapAllocator<T> {
  pub const fn new() -> Self {
    Self {
      _marker: PhantomData,
    }
  }
}

impl<T> Default for HeapAllocator<T> {
  fn default() -> Self {
    Self::new()
  }
}

impl<T> Clone for HeapAllocator<T> {
  fn clone(&self) -> Self {
    Self::new()
  }
}

impl<T> fmt::Debug for HeapAllocator<T> {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    f.write_str("HeapAllocator")
  }
}

impl<T> ObjectAllocator for HeapAllocator<T> {
  type Elem = T;
  type Rebind<U> = HeapAllocator<U>;

  fn allocate(&mut self) -> NonNull<T> {
    let layout = Layout::new::<T>();
    if layout.size() == 0 {
      return NonNull::dangling();
    }

    match NonNull::new(unsafe { alloc::alloc(layout) }) {
      Some(ptr) => ptr.cast(),
      None => alloc::handle_alloc_error(layout),
    }
  }

  unsafe fn deallocate(
    &mut self,
    ptr: *mut T,
  ) {
    let layout = Layout::new::<T>();
    if ptr.is_null() || layout.size() == 0 {
      return;
    }
    unsafe { alloc::dealloc(ptr.cast(), layout) };
  }

  fn max_size(&self) -> usize {
    usize::MAX / Layout::new::<T>().size().max(1)
  }

  fn rebind<U>(&self) -> Result<HeapAllocator<U>, PoolError> {
    Ok(HeapAllocator::new())
  }
}
