use std::env;
use std::path::PathBuf;

fn get_target_os() -> String {
    let target = env::var("TARGET").unwrap_or_default();

    if target.contains("apple-darwin") {
        "darwin"
    } else if target.contains("windows") {
        "windows"
    } else {
        "linux"
    }
    .to_string()
}

fn main() {
    println!("cargo:rerun-if-env-changed=SHADOW_LIB_DIR");

    // Nothing to link unless the native binding is enabled
    if env::var_os("CARGO_FEATURE_NATIVE").is_none() {
        return;
    }

    // Without SHADOW_LIB_DIR the linker falls back to the system search path
    let Some(lib_dir) = env::var_os("SHADOW_LIB_DIR").map(PathBuf::from) else {
        println!("cargo:warning=SHADOW_LIB_DIR not set, linking libshadow from the system path");
        return;
    };

    println!("cargo:rustc-link-search=native={}", lib_dir.display());

    // Set the rpath for the run-time linker based on the OS
    match get_target_os().as_str() {
        "darwin" => {
            println!("cargo:rustc-link-arg=-Wl,-rpath,@executable_path");
            println!("cargo:rustc-link-arg=-Wl,-rpath,{}", lib_dir.display());
        }
        "linux" => {
            println!("cargo:rustc-link-arg=-Wl,-rpath,$ORIGIN");
            println!("cargo:rustc-link-arg=-Wl,-rpath,{}", lib_dir.display());
        }
        // On Windows the DLL must sit next to the executable or on PATH
        _ => {}
    }
}
