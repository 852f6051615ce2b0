use crate::slot::Slot;

/// Slot region size of a block when none is configured.
pub const DEFAULT_BLOCK_SIZE: usize = 4096;

/// Pool configuration.
///
/// `block_size` counts the bytes of a block's slot region only. The block
/// header and the padding that aligns the first slot are reserved on top of
/// it, so a block configured for `n * slot_size` bytes holds exactly `n`
/// slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PoolConfig {
  pub block_size: usize,
}

impl PoolConfig {
  pub const fn new(block_size: usize) -> Self {
    Self { block_size }
  }

  /// A configuration whose blocks hold exactly `slots` elements of `T`.
  pub const fn for_slots<T>(slots: usize) -> Self {
    Self::new(slots.saturating_mul(Slot::<T>::SIZE))
  }

  pub const fn with_block_size(
    mut self,
    block_size: usize,
  ) -> Self {
    self.block_size = block_size;
    self
  }
}

impl Default for PoolConfig {
  fn default() -> Self {
    Self::new(DEFAULT_BLOCK_SIZE)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::mem;

  #[test]
  fn test_default_block_size() {
    assert_eq!(PoolConfig::default().block_size, DEFAULT_BLOCK_SIZE);
  }

  #[test]
  fn test_for_slots() {
    let config = PoolConfig::for_slots::<[u64; 2]>(4);
    assert_eq!(config.block_size, 64);

    // Small elements still occupy a full free-list link.
    let config = PoolConfig::for_slots::<u8>(3);
    assert_eq!(config.block_size, 3 * mem::size_of::<usize>());
  }

  #[test]
  fn test_with_block_size() {
    let config = PoolConfig::default().with_block_size(128);
    assert_eq!(config, PoolConfig::new(128));
  }
}
