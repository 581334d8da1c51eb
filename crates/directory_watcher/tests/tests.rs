#[cfg(test)]
mod tests {
    use directory_watcher::{remove_old_files, DirectoryWatcher};
    use regex::Regex;
    use std::fs;
    use std::path::Path;
    use std::thread;
    use std::time::Duration;

    fn rotated_pattern() -> Regex {
        Regex::new(r"^\d{4}-\d{2}-\d{2}\.log\.\d+$").unwrap()
    }

    fn touch(path: &Path) {
        fs::write(path, b"log data").unwrap();
    }

    #[test]
    fn test_sweep_deletes_only_stale_matching_files() {
        let dir = tempfile::tempdir().unwrap();

        let stale_matching = dir.path().join("2024-01-01.log.1");
        let stale_other = dir.path().join("keep.txt");
        touch(&stale_matching);
        touch(&stale_other);

        // Let the first two files age past the expiration, then add a fresh
        // matching one.
        thread::sleep(Duration::from_millis(300));
        let fresh_matching = dir.path().join("2024-01-02.log.1");
        touch(&fresh_matching);

        remove_old_files(
            dir.path(),
            Duration::from_millis(150),
            Some(&rotated_pattern()),
        );

        assert!(!stale_matching.exists(), "stale rotated file must be swept");
        assert!(stale_other.exists(), "non-matching file must survive");
        assert!(fresh_matching.exists(), "fresh rotated file must survive");
    }

    #[test]
    fn test_sweep_without_pattern_deletes_all_stale_files() {
        let dir = tempfile::tempdir().unwrap();

        let first = dir.path().join("anything.txt");
        let second = dir.path().join("2024-01-01.log.1");
        touch(&first);
        touch(&second);

        thread::sleep(Duration::from_millis(300));
        remove_old_files(dir.path(), Duration::from_millis(150), None);

        assert!(!first.exists());
        assert!(!second.exists());
    }

    #[test]
    fn test_sweep_recurses_into_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("archive");
        fs::create_dir_all(&nested).unwrap();

        let buried = nested.join("2023-12-31.log.2");
        touch(&buried);

        thread::sleep(Duration::from_millis(300));
        remove_old_files(
            dir.path(),
            Duration::from_millis(150),
            Some(&rotated_pattern()),
        );

        assert!(!buried.exists());
        assert!(nested.exists(), "directories themselves are not deleted");
    }

    #[test]
    fn test_active_daily_file_never_matches_rotated_pattern() {
        let dir = tempfile::tempdir().unwrap();
        let active = dir.path().join("2024-01-01.log");
        touch(&active);

        thread::sleep(Duration::from_millis(300));
        remove_old_files(
            dir.path(),
            Duration::from_millis(150),
            Some(&rotated_pattern()),
        );

        assert!(active.exists(), "the live daily file must never be swept");
    }

    #[test]
    fn test_watcher_sweeps_immediately_on_start() {
        let dir = tempfile::tempdir().unwrap();
        let stale = dir.path().join("2024-01-01.log.1");
        touch(&stale);
        thread::sleep(Duration::from_millis(300));

        let mut watcher = DirectoryWatcher::new();
        watcher.start(
            dir.path().to_path_buf(),
            Duration::from_millis(150),
            Some(rotated_pattern()),
            Duration::from_secs(60 * 60),
        );

        thread::sleep(Duration::from_millis(300));
        assert!(!stale.exists(), "first sweep runs on start, not after an hour");

        watcher.stop();
        assert!(!watcher.is_running());
    }

    #[test]
    fn test_stop_without_start_is_noop() {
        let mut watcher = DirectoryWatcher::new();
        watcher.stop();
        watcher.stop();
        assert!(!watcher.is_running());
    }
}
