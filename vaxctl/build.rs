use std::process::Command;

fn main() {
    if let Some(revision) = revision() {
        println!("cargo:rustc-env=VAXCTL_GIT_HASH={revision}");
    }

    println!("cargo:rerun-if-changed=../.git/HEAD");
    println!("cargo:rerun-if-changed=../.git/refs/");
}

/// Short commit hash, suffixed with `-dirty` when the tree has local edits.
fn revision() -> Option<String> {
    let hash = git(&["rev-parse", "--short", "HEAD"])?;
    if hash.is_empty() {
        return None;
    }
    match git(&["status", "--porcelain"]) {
        Some(changes) if !changes.is_empty() => Some(format!("{hash}-dirty")),
        _ => Some(hash),
    }
}

fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    output
        .status
        .success()
        .then(|| String::from_utf8_lossy(&output.stdout).trim().to_string())
}
