pub mod procfs;

#[cfg(test)]
pub mod mock;

use async_trait::async_trait;

pub use procfs::ProcFs;

/// Outcome of a single query against the process table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    Found(T),
    /// The process (or name) is not there. Expected whenever a process exits.
    NotFound,
    /// The query itself failed for a reason other than absence.
    Failed(String),
}

impl<T> Lookup<T> {
    pub fn found(self) -> Option<T> {
        match self {
            Lookup::Found(value) => Some(value),
            Lookup::NotFound | Lookup::Failed(_) => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }
}

/// Read-only view of the running processes.
///
/// Every call observes the process table at the instant it runs; nothing is
/// cached between calls, so a pid that existed a moment ago may be gone now.
#[async_trait]
pub trait ProcessInspector: Send + Sync + 'static {
    /// True iff the process's descriptor table can currently be enumerated.
    async fn exists(&self, pid: u32) -> bool;

    /// Number of descriptors the process holds right now.
    async fn count_descriptors(&self, pid: u32) -> Lookup<usize>;

    /// Lowest pid whose reported name equals `name` exactly.
    fn resolve_pid_by_name(&self, name: &str) -> Lookup<u32>;

    fn resolve_name_by_pid(&self, pid: u32) -> Lookup<String>;

    /// User owning the process, when the backend can tell.
    fn resolve_owner(&self, _pid: u32) -> Lookup<String> {
        Lookup::NotFound
    }
}
