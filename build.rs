use std::process::Command;

fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout)
        .ok()
        .map(|s| s.trim().to_string())
}

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/index");

    let hash = git(&["rev-parse", "--short", "HEAD"]).unwrap_or_default();
    let dirty = git(&["status", "--porcelain"]).is_some_and(|status| !status.is_empty());

    // Tagged, clean checkouts report the bare version.
    let release_tag = format!("v{}", env!("CARGO_PKG_VERSION"));
    let tagged = git(&["tag", "--points-at", "HEAD"])
        .is_some_and(|tags| tags.lines().any(|tag| tag == release_tag));

    let build = if (tagged && !dirty) || hash.is_empty() {
        String::new()
    } else if dirty {
        format!("{}-dirty", hash)
    } else {
        hash
    };
    println!("cargo:rustc-env=DRAFTPAD_BUILD={}", build);
}
