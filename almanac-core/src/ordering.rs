//! Display ordering for task collections.
//!
//! Four tiers: present before absent, active before inactive, incomplete
//! before complete among the active, soonest renewal first among the
//! inactive. `sort_index` is the final tie-break, so callers should keep it
//! unique among simultaneously active tasks; a stable sort degrades to
//! insertion order otherwise.

use std::cmp::Ordering;

use crate::calendar::WorldDate;
use crate::task::Task;

/// Comparator bound to a reference date (the renewal countdown depends on
/// "today").
#[derive(Debug, Clone, Copy)]
pub struct TaskOrdering {
    pub today: WorldDate,
}

impl TaskOrdering {
    pub fn new(today: WorldDate) -> Self {
        TaskOrdering { today }
    }

    pub fn compare(&self, a: &Task, b: &Task) -> Ordering {
        if a.active() && b.active() {
            // false < true, so incomplete sorts first.
            a.complete()
                .cmp(&b.complete())
                .then_with(|| a.sort_index().cmp(&b.sort_index()))
        } else if !a.active() && !b.active() {
            a.days_remaining(self.today).cmp(&b.days_remaining(self.today))
        } else {
            b.active().cmp(&a.active())
        }
    }

    /// Option-aware comparison: a present task sorts before an absent slot.
    pub fn compare_opt(&self, a: Option<&Task>, b: Option<&Task>) -> Ordering {
        match (a, b) {
            (Some(a), Some(b)) => self.compare(a, b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }

    pub fn sort(&self, tasks: &mut [Task]) {
        tasks.sort_by(|a, b| self.compare(a, b));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::Season;
    use crate::kind::TaskKind;
    use crate::task::{RenewPeriod, SilentCue};

    fn basic(name: &str) -> Task {
        Task::new(TaskKind::Basic, name)
    }

    #[test]
    fn test_four_tier_ordering() {
        let today = WorldDate::new(1, Season::Spring, 10);
        let ordering = TaskOrdering::new(today);

        let mut a = basic("A");
        a.set_sort_index(2);

        let mut b = basic("B");
        b.set_sort_index(1);

        let mut c = basic("C");
        c.mark_as_completed(&mut SilentCue);

        let mut d = basic("D").with_renewal(
            RenewPeriod::Custom,
            today.add_days(5),
            5,
        );
        d.set_active(false, today);

        let mut tasks = vec![a, b, c, d];
        ordering.sort(&mut tasks);

        let names: Vec<&str> = tasks.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A", "C", "D"]);
    }

    #[test]
    fn test_inactive_sorted_by_soonest_renewal() {
        let today = WorldDate::new(1, Season::Summer, 1);
        let ordering = TaskOrdering::new(today);

        let mut soon = basic("soon").with_renewal(RenewPeriod::Custom, today.add_days(2), 2);
        soon.set_active(false, today);
        let mut late = basic("late").with_renewal(RenewPeriod::Custom, today.add_days(9), 9);
        late.set_active(false, today);

        assert_eq!(ordering.compare(&soon, &late), Ordering::Less);
    }

    #[test]
    fn test_present_sorts_before_absent() {
        let ordering = TaskOrdering::new(WorldDate::default());
        let task = basic("only");

        assert_eq!(ordering.compare_opt(Some(&task), None), Ordering::Less);
        assert_eq!(ordering.compare_opt(None, Some(&task)), Ordering::Greater);
        assert_eq!(ordering.compare_opt(None, None), Ordering::Equal);
    }

    #[test]
    fn test_active_beats_inactive_regardless_of_completeness() {
        let today = WorldDate::default();
        let ordering = TaskOrdering::new(today);

        let mut done = basic("done");
        done.mark_as_completed(&mut SilentCue);

        let mut idle = basic("idle");
        idle.set_active(false, today);

        assert_eq!(ordering.compare(&done, &idle), Ordering::Less);
        assert_eq!(ordering.compare(&idle, &done), Ordering::Greater);
    }
}
