use sysinfo::{Pid, Process, ProcessRefreshKind, ProcessesToUpdate, System, UpdateKind};
use users::{Users, UsersCache};

pub fn resolve_username(uid: u32, users_cache: &UsersCache) -> String {
    users_cache
        .get_user_by_uid(uid)
        .map(|user| user.name().to_string_lossy().to_string())
        .unwrap_or_else(|| uid.to_string())
}

/// Name of the user owning `process`, or "unknown" when the uid is unreadable
pub fn process_owner(process: &Process, users_cache: &UsersCache) -> String {
    process
        .user_id()
        .map(|uid| resolve_username(**uid, users_cache))
        .unwrap_or_else(|| "unknown".to_string())
}

/// Snapshot of the process table restricted to names and owners.
pub fn snapshot_processes(pids: ProcessesToUpdate<'_>) -> System {
    let mut system = System::new();
    system.refresh_processes_specifics(
        pids,
        true,
        ProcessRefreshKind::nothing().with_user(UpdateKind::OnlyIfNotSet),
    );
    system
}

pub fn snapshot_process(pid: u32) -> System {
    snapshot_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]))
}

/// Picks the lowest pid whose reported name is exactly `name`.
///
/// The process table has no stable enumeration order, so ties are broken on
/// the pid rather than on whichever entry comes first.
pub fn first_pid_named<'a>(
    candidates: impl IntoIterator<Item = (u32, &'a str)>,
    name: &str,
) -> Option<u32> {
    candidates
        .into_iter()
        .filter(|(_, candidate)| *candidate == name)
        .map(|(pid, _)| pid)
        .min()
}
