//! Allocation churn benchmarks
//!
//! Compares the pool against one global-allocator request per object.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use slotpool::{HeapAllocator, MemoryPool, ObjectAllocator, PoolConfig};

#[derive(Clone, Copy)]
struct Node {
  _payload: [u64; 3],
}

const NODE: Node = Node { _payload: [1, 2, 3] };

/// Allocates `count` nodes, frees every other one, refills, then frees all.
fn churn<A: ObjectAllocator<Elem = Node>>(
  alloc: &mut A,
  count: usize,
) {
  let mut live = Vec::with_capacity(count);

  for _ in 0..count {
    let slot = alloc.allocate();
    unsafe { alloc.construct(slot, NODE) };
    live.push(slot);
  }

  for slot in live.iter().step_by(2) {
    unsafe { alloc.deallocate(slot.as_ptr()) };
  }
  for i in (0..count).step_by(2) {
    let slot = alloc.allocate();
    unsafe { alloc.construct(slot, NODE) };
    live[i] = slot;
  }

  for slot in live {
    unsafe { alloc.deallocate(black_box(slot).as_ptr()) };
  }
}

fn bench_churn(c: &mut Criterion) {
  let mut group = c.benchmark_group("churn");

  for count in [1_000usize, 10_000, 100_000] {
    group.bench_with_input(BenchmarkId::new("pool", count), &count, |b, &count| {
      b.iter(|| {
        let mut pool = MemoryPool::<Node>::new();
        churn(&mut pool, count);
      })
    });

    group.bench_with_input(BenchmarkId::new("pool_large_blocks", count), &count, |b, &count| {
      b.iter(|| {
        let mut pool = MemoryPool::<Node>::with_config(PoolConfig::for_slots::<Node>(4096)).unwrap();
        churn(&mut pool, count);
      })
    });

    group.bench_with_input(BenchmarkId::new("heap", count), &count, |b, &count| {
      b.iter(|| churn(&mut HeapAllocator::<Node>::new(), count))
    });
  }

  group.finish();
}

fn bench_reuse(c: &mut Criterion) {
  let mut pool = MemoryPool::<Node>::new();

  c.bench_function("pool_alloc_free_pair", |b| {
    b.iter(|| {
      let slot = pool.new_element(black_box(NODE));
      unsafe { pool.delete_element(slot.as_ptr()) };
    })
  });

  let mut heap = HeapAllocator::<Node>::new();
  c.bench_function("heap_alloc_free_pair", |b| {
    b.iter(|| {
      let slot = heap.allocate();
      unsafe {
        heap.construct(slot, black_box(NODE));
        heap.destroy(slot);
        heap.deallocate(slot.as_ptr());
      }
    })
  });
}

criterion_group!(benches, bench_churn, bench_reuse);
criterion_main!(benches);
