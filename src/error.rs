use thiserror::Error;

/// Errors surfaced by pool construction and fallible allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PoolError {
  /// A block must hold at least two slots.
  #[error("block size {block_size} cannot hold two slots of {slot_size} bytes")]
  BlockTooSmall { block_size: usize, slot_size: usize },

  /// Header, padding and slot region together exceed the address space.
  #[error("block of {block_size} bytes with alignment {align} overflows the address space")]
  LayoutOverflow { block_size: usize, align: usize },

  /// The system allocator refused to hand out a new block.
  #[error("system allocator could not provide a block of {size} bytes (alignment {align})")]
  OutOfMemory { size: usize, align: usize },
}
