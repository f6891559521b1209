use std::cmp::Ordering;

use crate::util::version::TaskVersion;

use super::types::{Priority, UpdateTask};

/// Total order between two candidate tasks, applied as successive tie-breaks:
///
/// 1. two distinct specific versions: older version first
/// 2. exactly one wildcard: the wildcard goes after the specific one
/// 3. otherwise (both wildcard, or equivalent versions): priority, `High` first
pub fn compare(a: (&TaskVersion, Priority), b: (&TaskVersion, Priority)) -> Ordering {
    let by_version = match (a.0, b.0) {
        (TaskVersion::Specific(va), TaskVersion::Specific(vb)) => va.cmp_release(vb),
        (TaskVersion::Wildcard, TaskVersion::Specific(_)) => Ordering::Greater,
        (TaskVersion::Specific(_), TaskVersion::Wildcard) => Ordering::Less,
        (TaskVersion::Wildcard, TaskVersion::Wildcard) => Ordering::Equal,
    };
    by_version.then_with(|| a.1.cmp(&b.1))
}

pub fn compare_tasks<C>(a: &dyn UpdateTask<C>, b: &dyn UpdateTask<C>) -> Ordering {
    compare((&a.version(), a.priority()), (&b.version(), b.priority()))
}

/// Stable sort: tasks equal under [`compare`] keep their registration order.
pub fn order_tasks<C>(tasks: &mut [&dyn UpdateTask<C>]) {
    tasks.sort_by(|a, b| compare_tasks(*a, *b));
}
