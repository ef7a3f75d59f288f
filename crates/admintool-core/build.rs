use std::env;
use std::process::Command;

fn main() {
    // Container builds have no .git; they pass the revision in explicitly.
    let sha = env::var("ADMINTOOL_GIT_SHA")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .or_else(git_short_sha)
        .unwrap_or_else(|| "unknown".into());

    println!("cargo:rustc-env=GIT_SHA={sha}");
    println!("cargo:rerun-if-env-changed=ADMINTOOL_GIT_SHA");
    println!("cargo:rerun-if-changed=../../.git/HEAD");
}

fn git_short_sha() -> Option<String> {
    Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map(|s| s.trim().to_string())
}
