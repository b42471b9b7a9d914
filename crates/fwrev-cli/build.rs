use std::process::Command;

fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8(output.stdout).ok()?;
    Some(text.trim().to_string())
}

fn main() {
    // Recompute when git state changes.
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/index");

    let sha = git(&["rev-parse", "--short", "HEAD"]).unwrap_or_else(|| "nogit".to_string());
    let dirty = match git(&["diff", "--stat"]) {
        Some(stat) if stat.is_empty() => "",
        Some(_) => ".dirty",
        None => "",
    };

    println!("cargo:rustc-env=FWREV_GIT_SHA={}", sha);
    println!("cargo:rustc-env=FWREV_GIT_DIRTY={}", dirty);
}
