use std::env;
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let crate_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let out = env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| crate_dir.join("include").join("hough_annotate.h"));
    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let config = cbindgen::Config {
        language: cbindgen::Language::C,
        include_guard: Some("HOUGH_ANNOTATE_H".to_string()),
        cpp_compat: true,
        ..Default::default()
    };
    cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_config(config)
        .generate()?
        .write_to_file(&out);

    println!("wrote {}", out.display());
    Ok(())
}
