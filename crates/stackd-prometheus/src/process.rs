use std::{fs, io, mem};

/// Resource usage of the current process.
///
/// Fields that come from `/proc` are `None` where it is not mounted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessSnapshot {
    /// User CPU time, seconds.
    pub user_cpu_seconds: f64,
    /// System CPU time, seconds.
    pub system_cpu_seconds: f64,
    /// Peak resident set size, bytes.
    pub max_rss_bytes: u64,
    pub resident_bytes: Option<u64>,
    pub virtual_bytes: Option<u64>,
    pub threads: Option<u64>,
    pub open_fds: Option<u64>,
}

impl ProcessSnapshot {
    /// Read the current usage. Only a failing `getrusage` is an error.
    pub fn capture() -> io::Result<Self> {
        let usage = rusage_self()?;
        let mut snap = Self {
            user_cpu_seconds: timeval_secs(usage.ru_utime),
            system_cpu_seconds: timeval_secs(usage.ru_stime),
            max_rss_bytes: max_rss_bytes(usage.ru_maxrss),
            ..Default::default()
        };

        if let Ok(statm) = fs::read_to_string("/proc/self/statm") {
            let page = page_size();
            let (size, resident) = parse_statm(&statm);
            snap.virtual_bytes = size.map(|p| p * page);
            snap.resident_bytes = resident.map(|p| p * page);
        }
        if let Ok(stat) = fs::read_to_string("/proc/self/stat") {
            snap.threads = parse_stat_threads(&stat);
        }
        snap.open_fds = fs::read_dir("/proc/self/fd").ok().map(|d| d.count() as u64);
        Ok(snap)
    }
}

fn rusage_self() -> io::Result<libc::rusage> {
    let mut usage: libc::rusage = unsafe { mem::zeroed() };
    let rc = unsafe { libc::getrusage(libc::RUSAGE_SELF, &mut usage) };
    if rc != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(usage)
}

fn timeval_secs(tv: libc::timeval) -> f64 {
    tv.tv_sec as f64 + tv.tv_usec as f64 / 1_000_000.0
}

/// `ru_maxrss` is KiB on Linux and bytes on macOS.
fn max_rss_bytes(raw: libc::c_long) -> u64 {
    let raw = u64::try_from(raw).unwrap_or(0);
    if cfg!(target_os = "macos") { raw } else { raw * 1024 }
}

fn page_size() -> u64 {
    let size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    u64::try_from(size).unwrap_or(4096)
}

/// `(size, resident)` in pages from `/proc/self/statm`.
fn parse_statm(raw: &str) -> (Option<u64>, Option<u64>) {
    let mut fields = raw.split_whitespace().map(|f| f.parse::<u64>().ok());
    (fields.next().flatten(), fields.next().flatten())
}

/// `num_threads` from `/proc/self/stat`.
///
/// `comm` may contain spaces, so fields are counted from the closing paren.
fn parse_stat_threads(raw: &str) -> Option<u64> {
    let (_, rest) = raw.rsplit_once(')')?;
    // rest starts at field 3 (state); num_threads is field 20
    rest.split_whitespace().nth(17)?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_statm() {
        assert_eq!(parse_statm("2110 395 330 1 0 175 0\n"), (Some(2110), Some(395)));
        assert_eq!(parse_statm(""), (None, None));
    }

    #[test]
    fn parses_threads_with_spaces_in_comm() {
        let stat = "4242 (stackd agent) S 1 4242 4242 0 -1 4194560 1 0 0 0 3 1 0 0 20 0 7 0 100 1000 200";
        assert_eq!(parse_stat_threads(stat), Some(7));
        assert_eq!(parse_stat_threads("garbage"), None);
    }

    #[test]
    fn timeval_conversion() {
        let tv = libc::timeval {
            tv_sec: 2,
            tv_usec: 500_000,
        };
        assert_eq!(timeval_secs(tv), 2.5);
    }

    #[test]
    fn capture_reads_self() {
        let snap = ProcessSnapshot::capture().unwrap();
        assert!(snap.user_cpu_seconds >= 0.0);
        assert!(snap.max_rss_bytes > 0);
        if cfg!(target_os = "linux") {
            assert!(snap.resident_bytes.unwrap_or(0) > 0);
            assert!(snap.open_fds.unwrap_or(0) > 0);
            assert!(snap.threads.unwrap_or(0) >= 1);
        }
    }
}
