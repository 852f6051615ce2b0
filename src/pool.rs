use std::{
  alloc,
  fmt,
  marker::PhantomData,
  mem,
  ptr::{self, NonNull},
};

use tracing::error;

use crate::{
  block::{BlockChain, BlockGeometry},
  bump::BumpCursor,
  config::{DEFAULT_BLOCK_SIZE, PoolConfig},
  error::PoolError,
  slot::{FreeList, Slot},
};

/// A fixed-size object pool for values of `T`.
///
/// Slots are carved from blocks of `config.block_size` bytes. `allocate`
/// prefers the most recently freed slot, then the next fresh slot of the
/// current block, and acquires a new block only when both are exhausted.
/// Blocks are returned to the system all at once when the pool is dropped.
///
/// The pool reclaims memory, not element lifetimes: dropping it does not run
/// `T`'s destructor for elements that are still live.
///
/// The pool is single-threaded. It may be moved to another thread when
/// `T: Send`, but it is never `Sync`.
pub struct MemoryPool<T> {
  config: PoolConfig,
  geometry: BlockGeometry,
  blocks: BlockChain,
  cursor: BumpCursor,
  free: FreeList<T>,
  _marker: PhantomData<T>,
}

unsafe impl<T: Send> Send for MemoryPool<T> {}

impl<T> MemoryPool<T> {
  /// Bytes taken by one slot: the larger of `T` and a free-list link.
  pub const SLOT_SIZE: usize = Slot::<T>::SIZE;

  /// Creates an empty pool with the default block size.
  ///
  /// Fails to compile when two `T` do not fit in a default block.
  pub fn new() -> Self {
    const {
      assert!(
        DEFAULT_BLOCK_SIZE >= 2 * Slot::<T>::SIZE,
        "element type too large for the default block size"
      )
    };

    // The assertion above is the only way the default config can be
    // rejected.
    Self::with_config(PoolConfig::default()).expect("default block size holds two slots")
  }

  /// Creates an empty pool. No memory is acquired until the first
  /// allocation.
  pub fn with_config(config: PoolConfig) -> Result<Self, PoolError> {
    let geometry = BlockGeometry::new(Slot::<T>::LAYOUT, config.block_size)?;

    Ok(Self {
      config,
      geometry,
      blocks: BlockChain::new(),
      cursor: BumpCursor::empty(),
      free: FreeList::new(),
      _marker: PhantomData,
    })
  }

  /// An empty pool for another element type with the same configuration.
  pub fn rebind<U>(&self) -> Result<MemoryPool<U>, PoolError> {
    MemoryPool::with_config(self.config)
  }

  /// Moves every block, the cursor and the free list out of `self`.
  ///
  /// `self` is left empty with the same configuration; pointers issued
  /// before the call now belong to the returned pool.
  pub fn take(&mut self) -> Self {
    let empty = self.clone();
    mem::replace(self, empty)
  }

  /// Reserves storage for one `T`.
  ///
  /// The returned slot is uninitialized. It stays owned by the caller until
  /// it is handed back to [`deallocate`](Self::deallocate).
  ///
  /// Aborts through [`std::alloc::handle_alloc_error`] if a new block is
  /// needed and the system allocator is out of memory.
  pub fn allocate(&mut self) -> NonNull<T> {
    match self.try_allocate() {
      Ok(slot) => slot,
      Err(err) => {
        error!(%err, blocks = self.blocks.len(), "pool block acquisition failed");
        alloc::handle_alloc_error(self.geometry.layout())
      }
    }
  }

  /// Like [`allocate`](Self::allocate), reporting exhaustion as an error.
  pub fn try_allocate(&mut self) -> Result<NonNull<T>, PoolError> {
    if let Some(slot) = self.free.pop() {
      return Ok(slot.cast());
    }

    let slot_size = self.geometry.slot_size();
    let slot = match self.cursor.bump(slot_size) {
      Some(slot) => slot,
      None => {
        let region = self.blocks.acquire(&self.geometry)?;
        self.cursor.restart(region, slot_size)
      }
    };

    Ok(slot.cast())
  }

  /// Returns a slot to the free list. A null `ptr` is ignored.
  ///
  /// # Safety
  ///
  /// A non-null `ptr` must come from `allocate` on this pool, must not have
  /// been deallocated since, and must not hold a live value (call
  /// [`destroy`](Self::destroy) first if it does). Neither condition is
  /// checked; violating them corrupts the free list.
  pub unsafe fn deallocate(
    &mut self,
    ptr: *mut T,
  ) {
    if let Some(slot) = NonNull::new(ptr) {
      unsafe { self.free.push(slot.cast()) };
    }
  }

  /// Moves `value` into an allocated slot.
  ///
  /// # Safety
  ///
  /// `slot` must be allocated from this pool and must not hold a live value;
  /// a live value there would be overwritten without being dropped.
  pub unsafe fn construct(
    &self,
    slot: NonNull<T>,
    value: T,
  ) {
    unsafe { slot.as_ptr().write(value) };
  }

  /// Drops the value living in `slot`, leaving the slot allocated but raw.
  ///
  /// # Safety
  ///
  /// `slot` must hold a live value constructed in this pool.
  pub unsafe fn destroy(
    &self,
    slot: NonNull<T>,
  ) {
    unsafe { ptr::drop_in_place(slot.as_ptr()) };
  }

  /// Allocates a slot and moves `value` into it.
  pub fn new_element(
    &mut self,
    value: T,
  ) -> NonNull<T> {
    let slot = self.allocate();
    unsafe { self.construct(slot, value) };
    slot
  }

  /// Like [`new_element`](Self::new_element), handing `value` back if no
  /// block could be acquired.
  pub fn try_new_element(
    &mut self,
    value: T,
  ) -> Result<NonNull<T>, (PoolError, T)> {
    match self.try_allocate() {
      Ok(slot) => {
        unsafe { self.construct(slot, value) };
        Ok(slot)
      }
      Err(err) => Err((err, value)),
    }
  }

  /// Drops the element behind `ptr` and frees its slot. A null `ptr` is
  /// ignored.
  ///
  /// # Safety
  ///
  /// A non-null `ptr` must come from `new_element` (or `allocate` followed
  /// by `construct`) on this pool and must still be live.
  pub unsafe fn delete_element(
    &mut self,
    ptr: *mut T,
  ) {
    if let Some(slot) = NonNull::new(ptr) {
      unsafe {
        self.destroy(slot);
        self.deallocate(slot.as_ptr());
      }
    }
  }

  pub fn address(
    &self,
    element: &T,
  ) -> NonNull<T> {
    NonNull::from(element)
  }

  /// Upper bound on the number of elements this pool could ever hold.
  ///
  /// Pure arithmetic over the block layout; never allocates.
  pub fn max_size(&self) -> usize {
    let block = self.geometry.layout().size();
    self.geometry.slots_per_block() * (usize::MAX / block)
  }

  pub fn config(&self) -> PoolConfig {
    self.config
  }

  pub fn slots_per_block(&self) -> usize {
    self.geometry.slots_per_block()
  }

  /// Number of blocks acquired so far.
  pub fn block_count(&self) -> usize {
    self.blocks.len()
  }

  /// Number of freed slots waiting for reuse.
  pub fn free_count(&self) -> usize {
    self.free.len()
  }
}

impl<T> Default for MemoryPool<T> {
  fn default() -> Self {
    Self::new()
  }
}

/// Cloning never copies storage: the clone is a new, empty pool with the
/// same configuration.
impl<T> Clone for MemoryPool<T> {
  fn clone(&self) -> Self {
    Self {
      config: self.config,
      geometry: self.geometry,
      blocks: BlockChain::new(),
      cursor: BumpCursor::empty(),
      free: FreeList::new(),
      _marker: PhantomData,
    }
  }
}

impl<T> fmt::Debug for MemoryPool<T> {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    f.debug_struct("MemoryPool")
      .field("block_size", &self.config.block_size)
      .field("slot_size", &Self::SLOT_SIZE)
      .field("blocks", &self.blocks.len())
      .field("fresh", &self.cursor.remaining(self.geometry.slot_size()))
      .field("free", &self.free.len())
      .finish()
  }
}
