//! Heap accounting for the memory quota.
//!
//! [`CountingAllocator`] wraps the system allocator and keeps, per thread, a
//! running balance of bytes allocated minus bytes freed.  A sandbox reads the
//! balance when a script run starts and again when it ends; the difference is
//! charged to that sandbox and carried into its next run.
//!
//! The allocator only counts once the final binary installs it:
//!
//! ```rust,ignore
//! #[global_allocator]
//! static GLOBAL: arena_sandbox::CountingAllocator = arena_sandbox::CountingAllocator;
//! ```
//!
//! Without it the balance never moves and only the per-value size limits
//! apply.

use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;

thread_local! {
    static BALANCE: Cell<isize> = const { Cell::new(0) };
}

/// [`System`] plus a per-thread live-byte balance.
#[derive(Copy, Clone, Debug, Default)]
pub struct CountingAllocator;

unsafe impl GlobalAlloc for CountingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = unsafe { System.alloc(layout) };
        if !ptr.is_null() {
            charge(layout.size() as isize);
        }
        ptr
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        let ptr = unsafe { System.alloc_zeroed(layout) };
        if !ptr.is_null() {
            charge(layout.size() as isize);
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        unsafe { System.dealloc(ptr, layout) };
        charge(-(layout.size() as isize));
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let new_ptr = unsafe { System.realloc(ptr, layout, new_size) };
        if !new_ptr.is_null() {
            charge(new_size as isize - layout.size() as isize);
        }
        new_ptr
    }
}

// The slot has no destructor and a const initializer, so touching it never
// allocates.  `try_with` covers the window while a thread is torn down.
#[inline]
fn charge(delta: isize) {
    let _ = BALANCE.try_with(|b| b.set(b.get().wrapping_add(delta)));
}

/// Live bytes allocated on the calling thread, minus those freed on it.
#[inline]
pub(crate) fn thread_balance() -> isize {
    BALANCE.try_with(Cell::get).unwrap_or(0)
}
