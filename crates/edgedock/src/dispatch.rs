/*!
Single-threaded cooperative event loop.

Every reaction in edgedock runs on one logical UI thread: native message
handling, the full-screen poll tick, and deferred position re-assertions. This
module owns the timer queue those tasks are scheduled onto.

- Tasks may be posted from any thread.
- Only the thread that first drives the loop may keep driving it.
- While a task runs, [`EventLoop::now`] reports that task's due time, so
  continuations posted from inside a task are spaced from the tick that
  scheduled them rather than from wall-clock time. Driving the loop with a
  future instant therefore replays the schedule deterministically.

```ignore
let event_loop = EventLoop::new();
event_loop.post_delayed(Duration::from_millis(100), || log::debug!("tick"));
event_loop.run(&stop)?; // blocks until `stop` is set
```
*/

use parking_lot::{Condvar, Mutex};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, ThreadId};
use std::time::{Duration, Instant};

use crate::types::{AppBarError, AppBarResult};

/// Upper bound on a blocking wait, so a stop request is noticed promptly.
const IDLE_WAIT: Duration = Duration::from_millis(50);

/// A unit of work scheduled onto the loop.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Handle to a scheduled task, used for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Default)]
struct TimerQueue {
  order: BinaryHeap<Reverse<(Instant, u64)>>,
  tasks: HashMap<u64, Task>,
  next_seq: u64,
}

impl TimerQueue {
  fn push(&mut self, due: Instant, task: Task) -> TimerId {
    let seq = self.next_seq;
    self.next_seq += 1;
    self.order.push(Reverse((due, seq)));
    self.tasks.insert(seq, task);
    TimerId(seq)
  }

  /// Pop the earliest task due at or before `now`. Cancelled entries are skipped.
  fn pop_due(&mut self, now: Instant) -> Option<(Instant, Task)> {
    while let Some(&Reverse((due, seq))) = self.order.peek() {
      if due > now {
        return None;
      }
      self.order.pop();
      if let Some(task) = self.tasks.remove(&seq) {
        return Some((due, task));
      }
    }
    None
  }

  fn next_due(&mut self) -> Option<Instant> {
    while let Some(&Reverse((due, seq))) = self.order.peek() {
      if self.tasks.contains_key(&seq) {
        return Some(due);
      }
      self.order.pop();
    }
    None
  }
}

struct LoopInner {
  queue: Mutex<TimerQueue>,
  owner: Mutex<Option<ThreadId>>,
  /// Due time of the task currently running, if any.
  clock: Mutex<Option<Instant>>,
  /// Loop time between tasks when it only advances through `run_due`.
  manual: Mutex<Option<Instant>>,
  wake: Condvar,
}

/// The UI loop. Clone is cheap (Arc bump).
#[derive(Clone)]
pub struct EventLoop {
  inner: Arc<LoopInner>,
}

impl std::fmt::Debug for EventLoop {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("EventLoop")
      .field("pending", &self.pending())
      .finish_non_exhaustive()
  }
}

impl Default for EventLoop {
  fn default() -> Self {
    Self::new()
  }
}

impl EventLoop {
  pub fn new() -> Self {
    Self {
      inner: Arc::new(LoopInner {
        queue: Mutex::new(TimerQueue::default()),
        owner: Mutex::new(None),
        clock: Mutex::new(None),
        manual: Mutex::new(None),
        wake: Condvar::new(),
      }),
    }
  }

  /// A loop whose time starts at `start` and moves only when driven with
  /// [`EventLoop::run_due`].
  #[cfg(test)]
  pub(crate) fn with_manual_clock(start: Instant) -> Self {
    let event_loop = Self::new();
    *event_loop.inner.manual.lock() = Some(start);
    event_loop
  }

  /// Loop time: the running task's due time, or wall-clock time between tasks.
  pub fn now(&self) -> Instant {
    if let Some(due) = *self.inner.clock.lock() {
      return due;
    }
    (*self.inner.manual.lock()).unwrap_or_else(Instant::now)
  }

  /// Schedule a task to run as soon as the loop is driven.
  pub fn post(&self, task: impl FnOnce() + Send + 'static) -> TimerId {
    self.post_at(self.now(), task)
  }

  /// Schedule a task to run once, `delay` after loop time.
  pub fn post_delayed(&self, delay: Duration, task: impl FnOnce() + Send + 'static) -> TimerId {
    self.post_at(self.now() + delay, task)
  }

  /// Schedule a task to run once at `due`.
  pub fn post_at(&self, due: Instant, task: impl FnOnce() + Send + 'static) -> TimerId {
    let id = self.inner.queue.lock().push(due, Box::new(task));
    self.inner.wake.notify_one();
    id
  }

  /// Cancel a scheduled task. Returns false if it already ran or was cancelled.
  pub fn cancel(&self, id: TimerId) -> bool {
    self.inner.queue.lock().tasks.remove(&id.0).is_some()
  }

  /// Number of scheduled tasks.
  pub fn pending(&self) -> usize {
    self.inner.queue.lock().tasks.len()
  }

  /// Due time of the earliest scheduled task.
  pub fn next_due(&self) -> Option<Instant> {
    self.inner.queue.lock().next_due()
  }

  /// Run every task due at or before `now`, in due order, including tasks
  /// those tasks schedule within the window. Returns the number run.
  pub fn run_due(&self, now: Instant) -> AppBarResult<usize> {
    self.claim_thread()?;

    let mut ran = 0;
    loop {
      // Never hold the queue lock while a task runs: tasks post continuations.
      let Some((due, task)) = self.inner.queue.lock().pop_due(now) else {
        break;
      };
      *self.inner.clock.lock() = Some(due);
      task();
      ran += 1;
    }
    *self.inner.clock.lock() = None;
    if let Some(manual) = self.inner.manual.lock().as_mut() {
      *manual = (*manual).max(now);
    }

    Ok(ran)
  }

  /// Run every task that is due right now.
  pub fn run_pending(&self) -> AppBarResult<usize> {
    self.run_due(Instant::now())
  }

  /// Drive the loop on the calling thread until `stop` is set.
  pub fn run(&self, stop: &AtomicBool) -> AppBarResult<()> {
    while !stop.load(Ordering::SeqCst) {
      self.run_pending()?;

      let mut queue = self.inner.queue.lock();
      let wait = queue
        .next_due()
        .map_or(IDLE_WAIT, |due| due.saturating_duration_since(Instant::now()))
        .min(IDLE_WAIT);
      if !wait.is_zero() {
        self.inner.wake.wait_for(&mut queue, wait);
      }
    }
    Ok(())
  }

  /// Bind the loop to the calling thread, or fail if another thread owns it.
  fn claim_thread(&self) -> AppBarResult<()> {
    let actual = thread::current().id();
    let mut owner = self.inner.owner.lock();
    match *owner {
      Some(owner) if owner != actual => Err(AppBarError::WrongThread { owner, actual }),
      Some(_) => Ok(()),
      None => {
        *owner = Some(actual);
        Ok(())
      }
    }
  }
}
