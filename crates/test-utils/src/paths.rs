//! Scratch directories for tests that write files.

/// Creates a temporary directory with a specific prefix, removed on drop.
pub fn temp_test_dir_with_prefix(prefix: &str) -> tempfile::TempDir {
    tempfile::Builder::new()
        .prefix(prefix)
        .tempdir()
        .expect("Failed to create temporary test directory")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_test_dir_with_prefix() {
        let dir = temp_test_dir_with_prefix("hysplit_test_");
        let path_str = dir.path().to_string_lossy();
        assert!(path_str.contains("hysplit_test_"));
    }
}
