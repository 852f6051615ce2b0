use std::ptr::NonNull;

use slotpool::{MemoryPool, PoolConfig};
use tracing_subscriber::EnvFilter;

/// A binary tree node, the kind of value a pool is meant for.
struct TreeNode {
  key: u64,
  left: Option<NonNull<TreeNode>>,
  right: Option<NonNull<TreeNode>>,
}

/// Prints where a slot landed relative to the first slot ever issued.
fn print_slot(
  label: &str,
  base: usize,
  slot: NonNull<TreeNode>,
) {
  let addr = slot.addr().get();
  println!(
    "[{}] slot = {:#X}, offset from first slot = {:+}",
    label,
    addr,
    addr as isize - base as isize
  );
}

fn insert(
  pool: &mut MemoryPool<TreeNode>,
  root: &mut Option<NonNull<TreeNode>>,
  key: u64,
) {
  let mut link = root;
  while let Some(mut node) = *link {
    let node = unsafe { node.as_mut() };
    link = if key < node.key { &mut node.left } else { &mut node.right };
  }
  *link = Some(pool.new_element(TreeNode {
    key,
    left: None,
    right: None,
  }));
}

fn delete_tree(
  pool: &mut MemoryPool<TreeNode>,
  node: Option<NonNull<TreeNode>>,
) {
  if let Some(node) = node {
    let (left, right) = unsafe { (node.as_ref().left, node.as_ref().right) };
    delete_tree(pool, left);
    delete_tree(pool, right);
    unsafe { pool.delete_element(node.as_ptr()) };
  }
}

fn main() {
  // RUST_LOG=slotpool=trace shows every block acquisition.
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("slotpool=trace")))
    .init();

  // Eight nodes per block so block acquisition is easy to spot.
  let mut pool = MemoryPool::with_config(PoolConfig::for_slots::<TreeNode>(8)).unwrap();
  println!("{pool:?}");
  println!("max_size = {}", pool.max_size());

  // --------------------------------------------------------------------
  // 1) Fill the first block and spill into a second one.
  // --------------------------------------------------------------------
  let first = pool.new_element(TreeNode {
    key: 0,
    left: None,
    right: None,
  });
  let base = first.addr().get();
  print_slot("1", base, first);

  let mut others = Vec::new();
  for key in 1..10 {
    let slot = pool.new_element(TreeNode {
      key,
      left: None,
      right: None,
    });
    print_slot("1", base, slot);
    others.push(slot);
  }
  println!("[1] {pool:?}");

  // --------------------------------------------------------------------
  // 2) Free two slots; the next allocations reuse them newest-first.
  // --------------------------------------------------------------------
  unsafe {
    pool.delete_element(others[2].as_ptr());
    pool.delete_element(others[5].as_ptr());
  }
  println!("\n[2] freed {:?} then {:?}", others[2], others[5]);

  let reused = pool.allocate();
  println!(
    "[2] next allocate -> {:?} (most recently freed? {})",
    reused,
    reused == others[5]
  );
  unsafe { pool.deallocate(reused.as_ptr()) };

  // --------------------------------------------------------------------
  // 3) Build a small tree out of pooled nodes, then tear it down.
  // --------------------------------------------------------------------
  let mut root = None;
  for key in [50, 20, 70, 10, 30, 60, 80, 25, 65] {
    insert(&mut pool, &mut root, key);
  }
  println!("\n[3] tree built: {pool:?}");
  delete_tree(&mut pool, root);
  println!("[3] tree deleted: {pool:?}");

  for slot in others.into_iter().enumerate().filter(|(i, _)| *i != 2 && *i != 5).map(|(_, slot)| slot) {
    unsafe { pool.delete_element(slot.as_ptr()) };
  }
  unsafe { pool.delete_element(first.as_ptr()) };

  // --------------------------------------------------------------------
  // 4) Dropping the pool releases every block in one pass.
  // --------------------------------------------------------------------
  println!("\n[4] {pool:?}");
  drop(pool);
}
