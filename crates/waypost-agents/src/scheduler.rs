// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A small delayed-job scheduler for fire-and-forget cleanup work.
//!
//! One worker thread drains a channel of `(deadline, job)` pairs into a
//! deadline-ordered heap and runs each job when its time comes. Jobs are
//! best-effort by construction: there is no handle to a scheduled job, no
//! cancellation, and no result. The worker exits — discarding anything
//! still pending — once every `Scheduler` clone has been dropped.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::thread;
use std::time::{Duration, Instant};

type Job = Box<dyn FnOnce() + Send>;

struct Entry {
    deadline: Instant,
    seq: u64,
    job: Job,
}

// Min-heap by deadline; `seq` keeps same-instant jobs in submission order.
impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .deadline
            .cmp(&self.deadline)
            .then(other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline && self.seq == other.seq
    }
}

impl Eq for Entry {}

/// A cloneable handle to the scheduler's worker thread.
#[derive(Clone)]
pub struct Scheduler {
    tx: flume::Sender<Entry>,
}

impl Scheduler {
    /// Spawns the worker thread and returns a handle to it.
    pub fn new() -> Self {
        let (tx, rx) = flume::unbounded::<Entry>();
        thread::Builder::new()
            .name("waypost-scheduler".to_string())
            .spawn(move || run_worker(rx))
            .expect("spawning the scheduler thread");
        Self { tx }
    }

    /// Runs `job` on the worker thread after at least `delay`.
    ///
    /// A zero delay runs it as soon as the worker gets around to it.
    pub fn schedule_in(&self, delay: Duration, job: Job) {
        let entry = Entry {
            deadline: Instant::now() + delay,
            seq: 0, // overwritten by the worker
            job,
        };
        if self.tx.send(entry).is_err() {
            log::warn!("Scheduler worker is gone, dropping a delayed job");
        }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

fn run_worker(rx: flume::Receiver<Entry>) {
    log::debug!("Scheduler worker started");
    let mut queue: BinaryHeap<Entry> = BinaryHeap::new();
    let mut next_seq: u64 = 0;

    loop {
        let received = match queue.peek() {
            Some(entry) => {
                let timeout = entry.deadline.saturating_duration_since(Instant::now());
                match rx.recv_timeout(timeout) {
                    Ok(entry) => Some(entry),
                    Err(flume::RecvTimeoutError::Timeout) => None,
                    Err(flume::RecvTimeoutError::Disconnected) => break,
                }
            }
            None => match rx.recv() {
                Ok(entry) => Some(entry),
                Err(flume::RecvError::Disconnected) => break,
            },
        };

        if let Some(mut entry) = received {
            entry.seq = next_seq;
            next_seq += 1;
            queue.push(entry);
        }

        while queue
            .peek()
            .map_or(false, |e| e.deadline <= Instant::now())
        {
            let entry = queue.pop().unwrap();
            (entry.job)();
        }
    }
    log::debug!("Scheduler worker stopped, {} jobs discarded", queue.len());
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
    use std::sync::Arc;

    #[test]
    fn runs_job_after_delay() {
        let scheduler = Scheduler::new();
        let (tx, rx) = flume::unbounded();
        let started = Instant::now();
        scheduler.schedule_in(
            Duration::from_millis(30),
            Box::new(move || {
                tx.send(started.elapsed()).unwrap();
            }),
        );

        let elapsed = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert!(elapsed >= Duration::from_millis(30), "ran after {elapsed:?}");
    }

    #[test]
    fn zero_delay_runs_promptly() {
        let scheduler = Scheduler::new();
        let (tx, rx) = flume::unbounded();
        scheduler.schedule_in(Duration::ZERO, Box::new(move || tx.send(()).unwrap()));
        assert!(rx.recv_timeout(Duration::from_secs(2)).is_ok());
    }

    #[test]
    fn interleaved_deadlines_all_run() {
        let scheduler = Scheduler::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = flume::unbounded();

        for delay_ms in [40u64, 10, 25] {
            let counter = Arc::clone(&counter);
            let tx = tx.clone();
            scheduler.schedule_in(
                Duration::from_millis(delay_ms),
                Box::new(move || {
                    counter.fetch_add(1, AtomicOrdering::SeqCst);
                    let _ = tx.send(());
                }),
            );
        }
        for _ in 0..3 {
            rx.recv_timeout(Duration::from_secs(2)).unwrap();
        }
        assert_eq!(counter.load(AtomicOrdering::SeqCst), 3);
    }

    #[test]
    fn dropping_every_handle_stops_the_worker() {
        let scheduler = Scheduler::new();
        let clone = scheduler.clone();
        drop(scheduler);
        // The remaining handle still works.
        let (tx, rx) = flume::unbounded();
        clone.schedule_in(Duration::ZERO, Box::new(move || tx.send(()).unwrap()));
        assert!(rx.recv_timeout(Duration::from_secs(2)).is_ok());
        drop(clone);
        // No assertion possible on the thread itself; this mainly checks
        // nothing panics when the channel disconnects.
    }
}
