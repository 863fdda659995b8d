use chrono::{SecondsFormat, Utc};

fn main() {
    // Exposed by GET /api/health / 构建时间
    let build_time = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    println!("cargo:rustc-env=BUILD_TIME={}", build_time);
    println!("cargo:rerun-if-changed=build.rs");
}
