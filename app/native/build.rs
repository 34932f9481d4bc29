fn main() {
    // NSScreen and NSWorkspace are looked up at runtime, so AppKit must be linked explicitly
    if std::env::var("CARGO_CFG_TARGET_OS").is_ok_and(|os| os == "macos") {
        println!("cargo:rustc-link-lib=framework=AppKit");
    }
}
