//! `--json` output must be parseable even with logging turned up.

use std::path::Path;
use std::process::{Command, Output};

fn kwcache(workdir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_kwcache"))
        .args(args)
        .current_dir(workdir)
        .env("KWCACHE_DATABASE_PATH", workdir.join("keywords.db"))
        .env("RUST_LOG", "kwcache=debug,kwcache_sync=debug,kwcache_db=debug")
        .env_remove("KWCACHE_CONFIG")
        .output()
        .unwrap()
}

#[test]
fn test_dry_run_json_is_clean_on_stdout() {
    let dir = tempfile::tempdir().unwrap();

    let seed = kwcache(dir.path(), &["source", "seed"]);
    assert!(seed.status.success(), "seed failed: {}", String::from_utf8_lossy(&seed.stderr));

    let run = kwcache(dir.path(), &["sync", "run", "--dry-run", "--json"]);
    assert!(run.status.success(), "sync failed: {}", String::from_utf8_lossy(&run.stderr));

    let summary: serde_json::Value = serde_json::from_slice(&run.stdout).unwrap();
    assert_eq!(summary["total_keywords"], 10);
    assert_eq!(summary["rejected"], 0);
    assert!(summary["run_id"].is_string());

    // Logs still happen, just not on stdout
    let stderr = String::from_utf8_lossy(&run.stderr);
    assert!(stderr.contains("Sync complete"), "stderr: {}", stderr);
}
