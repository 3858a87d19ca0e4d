use crate::inspector::{Lookup, ProcessInspector};
use crate::utils::psutils::{first_pid_named, process_owner, snapshot_process, snapshot_processes};
use async_trait::async_trait;
use log::trace;
use std::io;
use std::path::PathBuf;
use sysinfo::{Pid, ProcessesToUpdate};
use users::UsersCache;

const DEFAULT_PROC_ROOT: &str = "/proc";

/// Inspector backed by the `/proc` pseudo-filesystem.
///
/// Descriptors are counted from `<root>/<pid>/fd`. Names and owners come from
/// the live process table through sysinfo, which always reads the real
/// `/proc` regardless of `root`.
pub struct ProcFs {
    root: PathBuf,
}

impl ProcFs {
    pub fn new(root: Option<PathBuf>) -> Self {
        let root = root.unwrap_or_else(|| PathBuf::from(DEFAULT_PROC_ROOT));
        Self { root }
    }

    fn fd_dir(&self, pid: u32) -> PathBuf {
        self.root.join(pid.to_string()).join("fd")
    }
}

impl Default for ProcFs {
    fn default() -> Self {
        Self::new(None)
    }
}

fn classify(err: io::Error) -> Lookup<usize> {
    match err.kind() {
        io::ErrorKind::NotFound => Lookup::NotFound,
        _ => Lookup::Failed(err.to_string()),
    }
}

#[async_trait]
impl ProcessInspector for ProcFs {
    async fn exists(&self, pid: u32) -> bool {
        tokio::fs::read_dir(self.fd_dir(pid)).await.is_ok()
    }

    async fn count_descriptors(&self, pid: u32) -> Lookup<usize> {
        let dir = self.fd_dir(pid);
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(err) => return classify(err),
        };

        let mut count = 0;
        loop {
            match entries.next_entry().await {
                Ok(Some(_)) => count += 1,
                Ok(None) => break,
                // The process can exit while its table is being walked
                Err(err) => return classify(err),
            }
        }
        trace!("{} holds {} entries", dir.display(), count);
        Lookup::Found(count)
    }

    fn resolve_pid_by_name(&self, name: &str) -> Lookup<u32> {
        let system = snapshot_processes(ProcessesToUpdate::All);
        let processes = system.processes();
        if processes.is_empty() {
            return Lookup::Failed("process table is empty".to_string());
        }

        let table: Vec<(u32, String)> = processes
            .iter()
            .filter(|(_, process)| process.thread_kind().is_none())
            .map(|(pid, process)| (pid.as_u32(), process.name().to_string_lossy().to_string()))
            .collect();

        match first_pid_named(table.iter().map(|(pid, n)| (*pid, n.as_str())), name) {
            Some(pid) => Lookup::Found(pid),
            None => Lookup::NotFound,
        }
    }

    fn resolve_name_by_pid(&self, pid: u32) -> Lookup<String> {
        let system = snapshot_process(pid);
        match system.process(Pid::from_u32(pid)) {
            Some(process) => Lookup::Found(process.name().to_string_lossy().to_string()),
            None => Lookup::NotFound,
        }
    }

    fn resolve_owner(&self, pid: u32) -> Lookup<String> {
        let system = snapshot_process(pid);
        let users_cache = UsersCache::new();
        match system.process(Pid::from_u32(pid)) {
            Some(process) => Lookup::Found(process_owner(process, &users_cache)),
            None => Lookup::NotFound,
        }
    }
}
