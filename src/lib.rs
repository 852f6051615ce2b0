//! # slotpool - A Fixed-Size Object Pool
//!
//! This crate provides [`MemoryPool`], an allocator specialized for one
//! element type. It carves large blocks into uniformly sized slots so that
//! high-churn workloads (tree nodes, list links) skip the general-purpose
//! allocator on every request.
//!
//! ## Overview
//!
//! ```text
//!   Pool State:
//!
//!   blocks ──► ┌──────┬─────┬──────┬──────┬──────┬──────┐
//!              │ prev │ pad │ live │ free │ live │      │   newest block
//!              └──┬───┴─────┴──────┴──────┴──────┴──────┘
//!                 │                   ▲             ▲      ▲
//!                 ▼                   │          cursor   end
//!              ┌──────┬─────┬──────┬──┼───┬──────┬──────┐
//!              │ null │ pad │ free │ live │ live │ live │   older block
//!              └──────┴─────┴──────┴──────┴──────┴──────┘
//!                                 ▲
//!   free ──► (newest freed slot) ─┘ ...
//! ```
//!
//! `allocate` pops the free list first, then bumps the cursor through the
//! newest block, and only acquires a new block once both are exhausted:
//!
//! ```text
//!   allocate()
//!     ├── free list non-empty?  ──► pop head          O(1)
//!     ├── cursor has a slot?    ──► bump              O(1)
//!     └── otherwise             ──► new block, bump   O(1) amortized
//!
//!   deallocate(p)
//!     └── push p onto the free list                   O(1)
//! ```
//!
//! ## Crate Structure
//!
//! ```text
//!   slotpool
//!   ├── align      - Alignment arithmetic (align_up!, padding_for)
//!   ├── block      - Block layout, acquisition and the block chain
//!   ├── bump       - Bump cursor over the newest block
//!   ├── slot       - Slot storage and the free list
//!   ├── pool       - MemoryPool
//!   ├── adapter    - ObjectAllocator trait and HeapAllocator
//!   ├── config     - PoolConfig
//!   └── error      - PoolError
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use slotpool::{MemoryPool, PoolConfig};
//!
//! struct Node {
//!     value: u64,
//!     next: Option<std::ptr::NonNull<Node>>,
//! }
//!
//! let mut pool = MemoryPool::<Node>::with_config(PoolConfig::for_slots::<Node>(256))?;
//!
//! let head = pool.new_element(Node { value: 1, next: None });
//! let tail = pool.new_element(Node { value: 2, next: Some(head) });
//!
//! unsafe {
//!     assert_eq!(tail.as_ref().value, 2);
//!     pool.delete_element(tail.as_ptr());
//!     pool.delete_element(head.as_ptr());
//! }
//!
//! // The most recently freed slot is handed out first.
//! assert_eq!(pool.allocate(), head);
//! # Ok::<(), slotpool::PoolError>(())
//! ```
//!
//! ## Block Layout
//!
//! ```text
//!   ┌──────────┬──────────┬────────┬────────┬─────┬────────┐
//!   │  header  │ padding  │ slot 0 │ slot 1 │ ... │ slot n │
//!   │  (prev)  │ to align │        │        │     │        │
//!   └──────────┴──────────┴────────┴────────┴─────┴────────┘
//!   ◄─── reserved ───────►◄──────── block_size bytes ──────►
//! ```
//!
//! `block_size` counts the slot region only, so a block configured for
//! `n * SLOT_SIZE` bytes holds exactly `n` slots. Blocks come from
//! `posix_memalign` and go back to `free` together when the pool drops.
//!
//! ## Limitations
//!
//! - **Single-threaded**: no synchronization; use one pool per thread
//! - **No validation on free**: double frees and foreign pointers corrupt
//!   the free list
//! - **No element cleanup on drop**: live elements must be deleted before
//!   the pool goes away, or their destructors never run
//! - **Unix-only**: blocks are requested through `libc`
//!
//! ## Safety
//!
//! Handing out raw slots is inherently unsafe. Everything that relies on the
//! caller to return a slot exactly once, or to pair construction with
//! destruction, is an `unsafe fn` with its contract spelled out.

pub mod adapter;
pub mod align;
mod block;
mod bump;
mod config;
mod error;
mod pool;
mod slot;

pub use adapter::{HeapAllocator, ObjectAllocator};
pub use config::{DEFAULT_BLOCK_SIZE, PoolConfig};
pub use error::PoolError;
pub use pool::MemoryPool;
