use std::path::Path;

/// Replace characters that are unsafe in a file name
pub fn sanitize_filename(name: &str) -> String {
    let mut cleaned = name.replace(['/', '\\', ':', '?', '&', '=', '#', '*', '"', '<', '>', '|'], "_");

    // Limit filename length
    if cleaned.len() > 100 {
        let mut cut = 100;
        while !cleaned.is_char_boundary(cut) {
            cut -= 1;
        }
        cleaned.truncate(cut);
    }
    cleaned
}

/// Create `dir` and its parents if missing
pub async fn ensure_dir(dir: &Path) -> std::io::Result<()> {
    if !dir.as_os_str().is_empty() {
        tokio::fs::create_dir_all(dir).await?;
    }
    Ok(())
}
