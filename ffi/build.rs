use std::env;
use std::path::PathBuf;

fn main() {
    let crate_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".into()));

    println!("cargo:rerun-if-changed=src/lib.rs");
    println!("cargo:rerun-if-changed=src/types.rs");

    let Ok(out_dir) = env::var("OUT_DIR") else {
        println!("cargo:warning=header generation skipped: OUT_DIR not set");
        return;
    };
    let out = PathBuf::from(out_dir).join("upload_ffi.h");

    match cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_language(cbindgen::Language::C)
        .with_include_guard("UPLOAD_FFI_H")
        .generate()
    {
        Ok(bindings) => {
            bindings.write_to_file(&out);
            println!("cargo:rustc-env=UPLOAD_FFI_HEADER={}", out.display());
        }
        Err(e) => println!("cargo:warning=header generation skipped: {e}"),
    }
}
