// File: crates/ezchart-render-skia/build.rs
// Summary: Links Windows system libraries that Skia's font manager and ICU need.

fn main() {
    #[cfg(target_os = "windows")]
    {
        // RegOpenKeyExW / RegQueryInfoKeyW are pulled in by Skia's font lookup.
        println!("cargo:rustc-link-lib=advapi32");
    }
}
