//! Scripted inspector for exercising the sampler without real processes.

use crate::inspector::{Lookup, ProcessInspector};
use crate::utils::psutils::first_pid_named;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Replays a fixed sequence of measurements for one process.
///
/// Once the script runs dry the process counts as exited.
pub struct ScriptedInspector {
    processes: Vec<(u32, String)>,
    script: Mutex<VecDeque<Lookup<usize>>>,
    measurements: AtomicUsize,
}

impl ScriptedInspector {
    pub fn with_script(pid: u32, name: &str, script: Vec<Lookup<usize>>) -> Self {
        Self {
            processes: vec![(pid, name.to_string())],
            script: Mutex::new(script.into()),
            measurements: AtomicUsize::new(0),
        }
    }

    /// A process reporting `counts`, one per measurement, then disappearing.
    pub fn alive(pid: u32, name: &str, counts: &[usize]) -> Self {
        Self::with_script(pid, name, counts.iter().copied().map(Lookup::Found).collect())
    }

    /// An empty process table.
    pub fn empty() -> Self {
        Self {
            processes: Vec::new(),
            script: Mutex::new(VecDeque::new()),
            measurements: AtomicUsize::new(0),
        }
    }

    pub fn with_process(mut self, pid: u32, name: &str) -> Self {
        self.processes.push((pid, name.to_string()));
        self
    }

    /// Number of `count_descriptors` calls served so far.
    pub fn measurements(&self) -> usize {
        self.measurements.load(Ordering::Relaxed)
    }

    fn knows(&self, pid: u32) -> bool {
        self.processes.iter().any(|(known, _)| *known == pid)
    }
}

#[async_trait]
impl ProcessInspector for ScriptedInspector {
    async fn exists(&self, pid: u32) -> bool {
        self.knows(pid)
    }

    async fn count_descriptors(&self, pid: u32) -> Lookup<usize> {
        self.measurements.fetch_add(1, Ordering::Relaxed);
        if !self.knows(pid) {
            return Lookup::NotFound;
        }
        let mut script = self.script.lock().unwrap();
        script.pop_front().unwrap_or(Lookup::NotFound)
    }

    fn resolve_pid_by_name(&self, name: &str) -> Lookup<u32> {
        let table = self.processes.iter().map(|(pid, n)| (*pid, n.as_str()));
        match first_pid_named(table, name) {
            Some(pid) => Lookup::Found(pid),
            None => Lookup::NotFound,
        }
    }

    fn resolve_name_by_pid(&self, pid: u32) -> Lookup<String> {
        self.processes
            .iter()
            .find(|(known, _)| *known == pid)
            .map(|(_, name)| Lookup::Found(name.clone()))
            .unwrap_or(Lookup::NotFound)
    }

    fn resolve_owner(&self, pid: u32) -> Lookup<String> {
        if self.knows(pid) {
            Lookup::Found("tester".to_string())
        } else {
            Lookup::NotFound
        }
    }
}
