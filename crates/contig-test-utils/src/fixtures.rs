//! Element types that record their own construction and destruction.
//!
//! - [`Ledger`]: shared counters for a family of [`Tracked`] values.
//! - [`Tracked`]: clonable value; the ledger can make its Nth clone or
//!   drop panic.
//! - [`MoveOnly`]: tracked value without `Clone`.
//! - [`DefaultBomb`]: `Default` type with a per-thread construction fuse.

use std::cell::Cell;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Default)]
struct Counters {
    live: AtomicUsize,
    drops: AtomicUsize,
    clones: AtomicUsize,
    /// Successful clones still allowed; `usize::MAX` means unlimited.
    clone_budget: AtomicUsize,
    /// Drops still allowed before one panics; `usize::MAX` means unlimited.
    drop_budget: AtomicUsize,
}

/// Shared counters for every [`Tracked`] value created through it.
///
/// Cheap to clone; all clones observe the same counts. Uses atomics so
/// tracked values satisfy `Send` and `Sync`.
#[derive(Clone)]
pub struct Ledger {
    counters: Arc<Counters>,
}

impl Ledger {
    pub fn new() -> Self {
        let counters = Counters::default();
        counters.clone_budget.store(usize::MAX, Ordering::Relaxed);
        counters.drop_budget.store(usize::MAX, Ordering::Relaxed);
        Self {
            counters: Arc::new(counters),
        }
    }

    /// Create a live value recorded in this ledger.
    pub fn track(&self, value: u32) -> Tracked {
        self.counters.live.fetch_add(1, Ordering::Relaxed);
        Tracked {
            value,
            ledger: self.clone(),
        }
    }

    /// Create a live, non-clonable value recorded in this ledger.
    pub fn track_move_only(&self, value: u32) -> MoveOnly {
        MoveOnly(self.track(value))
    }

    /// Allow `successes` more clones, then panic on the next one.
    pub fn fail_clone_after(&self, successes: usize) {
        self.counters
            .clone_budget
            .store(successes, Ordering::Relaxed);
    }

    /// Allow `successes` more drops, then panic in the next one.
    ///
    /// The panicking value is still counted as dropped. The fuse fires once
    /// and never while the thread is already unwinding.
    pub fn fail_drop_after(&self, successes: usize) {
        self.counters
            .drop_budget
            .store(successes, Ordering::Relaxed);
    }

    /// Remove any clone or drop fuse.
    pub fn disarm(&self) {
        self.counters
            .clone_budget
            .store(usize::MAX, Ordering::Relaxed);
        self.counters
            .drop_budget
            .store(usize::MAX, Ordering::Relaxed);
    }

    /// Values currently alive.
    pub fn live(&self) -> usize {
        self.counters.live.load(Ordering::Relaxed)
    }

    /// Values dropped so far.
    pub fn drops(&self) -> usize {
        self.counters.drops.load(Ordering::Relaxed)
    }

    /// Successful clones so far.
    pub fn clones(&self) -> usize {
        self.counters.clones.load(Ordering::Relaxed)
    }

    fn before_clone(&self) {
        let budget = &self.counters.clone_budget;
        let remaining = budget.load(Ordering::Relaxed);
        if remaining == 0 {
            panic!(
                "deliberate clone failure after {} successful clones",
                self.clones()
            );
        }
        if remaining != usize::MAX {
            budget.store(remaining - 1, Ordering::Relaxed);
        }
        self.counters.clones.fetch_add(1, Ordering::Relaxed);
        self.counters.live.fetch_add(1, Ordering::Relaxed);
    }

    fn after_drop(&self) {
        self.counters.live.fetch_sub(1, Ordering::Relaxed);
        self.counters.drops.fetch_add(1, Ordering::Relaxed);
        let budget = &self.counters.drop_budget;
        match budget.load(Ordering::Relaxed) {
            usize::MAX => {}
            0 if !std::thread::panicking() => {
                budget.store(usize::MAX, Ordering::Relaxed);
                panic!("deliberate drop failure after {} drops", self.drops() - 1);
            }
            0 => {}
            remaining => budget.store(remaining - 1, Ordering::Relaxed),
        }
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Ledger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ledger")
            .field("live", &self.live())
            .field("drops", &self.drops())
            .field("clones", &self.clones())
            .finish()
    }
}

/// A `u32` whose lifetime is recorded in a [`Ledger`].
pub struct Tracked {
    pub value: u32,
    ledger: Ledger,
}

impl Clone for Tracked {
    fn clone(&self) -> Self {
        self.ledger.before_clone();
        Self {
            value: self.value,
            ledger: self.ledger.clone(),
        }
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.ledger.after_drop();
    }
}

impl PartialEq for Tracked {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl PartialEq<u32> for Tracked {
    fn eq(&self, other: &u32) -> bool {
        self.value == *other
    }
}

impl fmt::Debug for Tracked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tracked({})", self.value)
    }
}

/// A tracked value that cannot be cloned.
#[derive(Debug, PartialEq)]
pub struct MoveOnly(pub Tracked);

impl MoveOnly {
    pub fn value(&self) -> u32 {
        self.0.value
    }
}

thread_local! {
    static BOMB_FUSE: Cell<Option<usize>> = const { Cell::new(None) };
    static BOMB_LIVE: Cell<usize> = const { Cell::new(0) };
}

/// A `Default` type whose construction can be made to panic.
///
/// State is per thread, so concurrently running tests do not interfere.
/// Each test should call [`DefaultBomb::reset`] before building any bombs.
#[derive(Debug, PartialEq, Eq)]
pub struct DefaultBomb(pub u32);

impl DefaultBomb {
    /// Allow `successes` more default constructions, then panic on the next.
    pub fn arm(successes: usize) {
        BOMB_FUSE.with(|fuse| fuse.set(Some(successes)));
    }

    /// Remove the fuse and reset the live count for this thread.
    pub fn reset() {
        BOMB_FUSE.with(|fuse| fuse.set(None));
        BOMB_LIVE.with(|live| live.set(0));
    }

    /// Bombs alive on this thread.
    pub fn live() -> usize {
        BOMB_LIVE.with(Cell::get)
    }
}

impl Default for DefaultBomb {
    fn default() -> Self {
        BOMB_FUSE.with(|fuse| match fuse.get() {
            Some(0) => panic!("deliberate default-construction failure"),
            Some(n) => fuse.set(Some(n - 1)),
            None => {}
        });
        BOMB_LIVE.with(|live| live.set(live.get() + 1));
        DefaultBomb(0)
    }
}

impl Drop for DefaultBomb {
    fn drop(&mut self) {
        BOMB_LIVE.with(|live| live.set(live.get() - 1));
    }
}
