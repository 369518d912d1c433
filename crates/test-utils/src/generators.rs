//! Generators for synthetic trajectory dumps and fake model executables.

use std::fs;
use std::path::{Path, PathBuf};

use crate::fixtures::HEADER;

/// Creates a dump with `trajectories` ids and `steps` points each.
///
/// Lines are written step-major (all ids for step 0, then step 1, ...), the
/// way HYSPLIT interleaves multi-trajectory output. Point `(id, step)` sits
/// at latitude `40 + id + step * 0.1` and longitude `-75 - step * 0.1`, and
/// forecast hours count down from 0 (backward run).
///
/// # Example
///
/// ```
/// use test_utils::create_tdump;
///
/// let text = create_tdump(2, 3);
/// assert_eq!(text.lines().count(), 8 + 6);
/// ```
pub fn create_tdump(trajectories: u32, steps: u32) -> String {
    let mut text = String::from(HEADER);
    for step in 0..steps {
        for id in 1..=trajectories {
            let lat = 40.0 + id as f64 + step as f64 * 0.1;
            let lon = -75.0 - step as f64 * 0.1;
            let height = 500.0 - step as f64 * 10.0;
            text.push_str(&format!(
                "{:6}{:6}{:6}{:6}{:6}{:6}{:9.3}{:9.3}{:9.1}\n",
                id,
                24,
                1,
                1,
                step % 24,
                -(step as i32),
                lat,
                lon,
                height
            ));
        }
    }
    text
}

/// Writes a shell script that imitates the trajectory model: it writes
/// `output_name` in its working directory and exits 0.
///
/// Run it with `/bin/sh <script>` so no executable bit is needed.
pub fn write_fake_model(dir: &Path, output_name: &str, tdump: &str) -> PathBuf {
    let script = dir.join("fake_model.sh");
    let body = format!(
        "#!/bin/sh\ntest -f CONTROL || exit 3\ncat > {} <<'EOF'\n{}EOF\necho model finished\n",
        output_name, tdump
    );
    fs::write(&script, body).expect("Failed to write fake model script");
    script
}

/// Writes a shell script that exits 0 after writing bytes that are not
/// valid UTF-8 to `output_name`.
pub fn write_invalid_utf8_model(dir: &Path, output_name: &str) -> PathBuf {
    let script = dir.join("binary_model.sh");
    let body = format!("#!/bin/sh\nprintf '\\377\\376\\n' > {}\n", output_name);
    fs::write(&script, body).expect("Failed to write binary model script");
    script
}

/// Writes a shell script that prints to stderr and exits with `code`.
pub fn write_failing_model(dir: &Path, code: i32, message: &str) -> PathBuf {
    let script = dir.join("failing_model.sh");
    let body = format!("#!/bin/sh\necho '{}' >&2\nexit {}\n", message, code);
    fs::write(&script, body).expect("Failed to write failing model script");
    script
}

/// Writes a shell script that exits 0 without producing any output file.
pub fn write_silent_model(dir: &Path) -> PathBuf {
    let script = dir.join("silent_model.sh");
    fs::write(&script, "#!/bin/sh\nexit 0\n").expect("Failed to write silent model script");
    script
}

/// Writes a shell script that sleeps for `secs` seconds.
pub fn write_slow_model(dir: &Path, secs: u32) -> PathBuf {
    let script = dir.join("slow_model.sh");
    fs::write(&script, format!("#!/bin/sh\nsleep {}\n", secs))
        .expect("Failed to write slow model script");
    script
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_tdump_line_count() {
        let text = create_tdump(3, 4);
        assert_eq!(text.lines().count(), 8 + 12);
    }

    #[test]
    fn test_create_tdump_data_lines_have_nine_tokens() {
        let text = create_tdump(2, 2);
        for line in text.lines().skip(8) {
            assert_eq!(line.split_whitespace().count(), 9, "line: {:?}", line);
        }
    }

    #[test]
    fn test_write_invalid_utf8_model() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_invalid_utf8_model(dir.path(), "tdump");
        let body = fs::read_to_string(script).unwrap();
        assert!(body.contains(r"printf '\377\376\n' > tdump"));
    }

    #[test]
    fn test_write_fake_model() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_fake_model(dir.path(), "tdump", "hello\n");
        let body = fs::read_to_string(script).unwrap();
        assert!(body.contains("cat > tdump"));
        assert!(body.contains("hello"));
    }
}
