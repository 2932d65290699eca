use std::process::Command;

fn main() {
    let profile = match std::env::var("PROFILE").as_deref() {
        Ok("release") => "release",
        _ => "development",
    };

    // VERSION overrides the manifest version
    let version = std::fs::read_to_string("VERSION")
        .map(|v| v.trim().to_string())
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string());

    let git_hash = git_short_hash().unwrap_or_else(|| "unknown".to_string());

    println!("cargo:rustc-env=MAZECRYPT_VERSION={}", version);
    println!("cargo:rustc-env=MAZECRYPT_PROFILE={}", profile);
    println!("cargo:rustc-env=MAZECRYPT_GIT_HASH={}", git_hash);
    println!("cargo:rerun-if-changed=VERSION");
    println!("cargo:rerun-if-env-changed=PROFILE");
}

fn git_short_hash() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let hash = String::from_utf8(output.stdout).ok()?;
    let hash = hash.trim();
    (!hash.is_empty()).then(|| hash.to_string())
}
