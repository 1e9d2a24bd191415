use std::path::PathBuf;

/// Directory holding the frontend's index.html and its wasm `pkg/` build output.
/// Uses STATIC_DIR, falling back to `src/front-tkw/www` relative to the working directory.
pub fn get_static_dir() -> PathBuf {
    std::env::var("STATIC_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("src/front-tkw/www"))
}
