//! Virtual-time task queue driving the game clocks and delayed effects.
//!
//! Nothing here sleeps. Front-ends feed wall-clock deltas through the
//! controllers' `advance`, tests feed exact durations.

use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

struct Entry<T>
{
    id: TaskId,
    due: Duration,
    period: Option<Duration>,
    task: T,
}

pub struct Scheduler<T>
{
    now: Duration,
    next_id: u64,
    entries: Vec<Entry<T>>,
}

impl<T: Clone> Scheduler<T>
{
    pub fn new() -> Self
    {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            entries: Vec::new(),
        }
    }

    pub fn now(&self) -> Duration
    {
        self.now
    }

    pub fn once(&mut self, delay: Duration, task: T) -> TaskId
    {
        self.push(delay, None, task)
    }

    /// First run is one full period from now.
    pub fn every(&mut self, period: Duration, task: T) -> TaskId
    {
        let period = period.max(Duration::from_millis(1));
        self.push(period, Some(period), task)
    }

    pub fn cancel(&mut self, id: TaskId) -> bool
    {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() != before
    }

    /// Removes (or re-arms, for recurring tasks) the earliest task due at or
    /// before `until` and moves the clock to its due time. Equal due times
    /// run in registration order.
    pub fn pop_due(&mut self, until: Duration) -> Option<T>
    {
        let index = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.due <= until)
            .min_by_key(|(_, entry)| (entry.due, entry.id.0))
            .map(|(index, _)| index)?;

        self.now = self.now.max(self.entries[index].due);
        match self.entries[index].period {
            Some(period) => {
                let entry = &mut self.entries[index];
                entry.due += period;
                Some(entry.task.clone())
            }
            None => Some(self.entries.swap_remove(index).task),
        }
    }

    pub fn settle(&mut self, until: Duration)
    {
        self.now = self.now.max(until);
    }

    fn push(&mut self, delay: Duration, period: Option<Duration>, task: T) -> TaskId
    {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            due: self.now + delay,
            period,
            task,
        });
        id
    }
}

impl<T: Clone> Default for Scheduler<T>
{
    fn default() -> Self
    {
        Self::new()
    }
}
