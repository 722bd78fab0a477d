use chrono::Local;
use std::process::Command;

// Embed a build identifier in the version string: the short commit hash,
// suffixed with a build timestamp when tracked files have local changes.
fn main() {
    let commit = git_stdout(&["rev-parse", "--short", "HEAD"]).unwrap_or_else(|| "unknown".to_string());

    let dirty = Command::new("git")
        .args(["diff", "--quiet", "HEAD"])
        .status()
        .is_ok_and(|s| !s.success());

    let build_hash = if dirty {
        format!("{commit}-dirty-{}", Local::now().format("%Y%m%d-%H%M%S"))
    } else {
        commit
    };
    println!("cargo:rustc-env=BUILD_HASH={build_hash}");

    // .git lives at the workspace root
    println!("cargo:rerun-if-changed=../../.git/HEAD");
    println!("cargo:rerun-if-changed=../../.git/index");
}

fn git_stdout(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
