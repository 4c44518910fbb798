#![allow(dead_code)]

use std::path::{Path, PathBuf};

pub use amcache_worker_test_utils::{init_tracing, with_timeout};

/// Write an executable shell script standing in for `amcache-evilhunter`.
#[cfg(unix)]
pub fn write_tool(dir: &Path, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("amcache-evilhunter");
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    path
}

/// A well-behaved fake tool: writes the JSON/CSV outputs it is pointed at,
/// echoes its flags and working directory, and lists the directory so tests
/// can check sidecar visibility.
pub const WELL_BEHAVED_TOOL: &str = r#"
json=""; csv=""; hive=""
while [ $# -gt 0 ]; do
  case "$1" in
    --json) json="$2"; shift 2 ;;
    --csv) csv="$2"; shift 2 ;;
    -i) hive="$2"; shift 2 ;;
    *) echo "arg $1"; shift ;;
  esac
done
echo "cwd $(pwd)"
[ -f "$hive" ] || { echo "missing hive $hive" >&2; exit 2; }
ls
echo '{"records": []}' > "$json"
echo 'name,sha1' > "$csv"
exit 0
"#;

/// Create `Amcache.hve` plus its transaction logs in `dir`.
pub fn write_hive(dir: &Path) -> PathBuf {
    let hive = dir.join("Amcache.hve");
    std::fs::write(&hive, b"regf").unwrap();
    std::fs::write(dir.join("Amcache.hve.LOG1"), b"").unwrap();
    std::fs::write(dir.join("Amcache.hve.LOG2"), b"").unwrap();
    hive
}
