use std::process::Command;

use chrono::Utc;

fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout).ok()
}

fn main() {
    println!("cargo:rerun-if-changed=../../.git/HEAD");
    println!("cargo:rerun-if-changed=../../.git/refs/");

    let version = env!("CARGO_PKG_VERSION");
    let release_tag = format!("cargo-changeset@v{version}");

    let tagged = git(&["tag", "--points-at", "HEAD"])
        .is_some_and(|tags| tags.lines().any(|line| line.trim() == release_tag));

    let version_string = match git(&["rev-parse", "--short", "HEAD"]) {
        Some(_) if tagged => version.to_owned(),
        Some(hash) => format!(
            "{version}+{}.{}",
            hash.trim(),
            Utc::now().format("%Y%m%d")
        ),
        None => format!("{version}+unknown"),
    };

    println!("cargo:rustc-env=CARGO_CHANGESET_VERSION={version_string}");
}
