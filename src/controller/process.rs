//! Process table snapshot and top-by-memory selection.

use std::cmp::Ordering;

use sysinfo::{System, Users};

use crate::model::ProcessRecord;

/// Build one record per live process from the current system snapshot.
///
/// Owner names are resolved through `users`; a uid with no passwd entry
/// leaves the owner empty rather than dropping the row.
pub fn build_records(sys: &System, users: &Users) -> Vec<ProcessRecord> {
    let total_memory = sys.total_memory();

    sys.processes()
        .values()
        .map(|p| {
            let user = p
                .user_id()
                .and_then(|uid| users.get_user_by_id(uid))
                .map(|u| u.name().to_string());
            let memory_percent = if total_memory > 0 {
                (p.memory() as f64 / total_memory as f64 * 100.0) as f32
            } else {
                0.0
            };

            ProcessRecord {
                pid: p.pid().as_u32(),
                name: p.name().to_string_lossy().into_owned(),
                user,
                memory_percent,
                cpu_percent: p.cpu_usage(),
            }
        })
        .collect()
}

/// Highest memory share first, at most `limit` rows.
///
/// The sort is stable: processes with equal memory share keep the order
/// they were enumerated in.
pub fn top_by_memory(mut records: Vec<ProcessRecord>, limit: usize) -> Vec<ProcessRecord> {
    records.sort_by(|a, b| {
        b.memory_percent
            .partial_cmp(&a.memory_percent)
            .unwrap_or(Ordering::Equal)
    });
    records.truncate(limit);
    records
}

#[cfg(test)]
mod tests {
    use crate::model::ProcessRecord;

    use super::top_by_memory;

    fn record(pid: u32, mem: f32) -> ProcessRecord {
        ProcessRecord {
            pid,
            name: format!("p{}", pid),
            user: None,
            memory_percent: mem,
            cpu_percent: 0.0,
        }
    }

    #[test]
    fn top_by_memory_empty() {
        assert!(top_by_memory(Vec::new(), 20).is_empty());
    }

    #[test]
    fn top_by_memory_sorts_descending() {
        let records = vec![record(1, 10.0), record(2, 50.0), record(3, 30.0)];
        let result = top_by_memory(records, 20);
        let pids: Vec<u32> = result.iter().map(|r| r.pid).collect();
        assert_eq!(pids, vec![2, 3, 1]);
    }

    #[test]
    fn top_by_memory_truncates() {
        let records = (1..=30).map(|pid| record(pid, pid as f32)).collect();
        let result = top_by_memory(records, 20);
        assert_eq!(result.len(), 20);
        assert_eq!(result[0].pid, 30);
        assert_eq!(result[19].pid, 11);
    }

    #[test]
    fn ties_keep_enumeration_order() {
        let records = vec![record(7, 5.0), record(3, 5.0), record(9, 5.0), record(1, 8.0)];
        let result = top_by_memory(records, 20);
        let pids: Vec<u32> = result.iter().map(|r| r.pid).collect();
        assert_eq!(pids, vec![1, 7, 3, 9]);
    }

    #[test]
    fn nan_does_not_panic() {
        let records = vec![record(1, f32::NAN), record(2, 1.0)];
        assert_eq!(top_by_memory(records, 20).len(), 2);
    }
}
