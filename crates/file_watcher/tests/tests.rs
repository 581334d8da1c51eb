#[cfg(test)]
mod tests {
    use crossbeam_channel::bounded;
    use file_watcher::{checkpoint_due, CheckPoint, FileWatcher, WatcherSettings};
    use std::fs;
    use std::time::Duration;

    #[test]
    fn test_size_threshold_triggers_callback() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("2024-01-01.log");
        fs::write(&log_path, vec![b'x'; 2048]).unwrap();

        let (fired_sender, fired_receiver) = bounded::<()>(16);

        let mut watcher = FileWatcher::new();
        watcher.update_settings(WatcherSettings {
            path: log_path,
            max_size_bytes: 1024,
            check_point: None,
        });
        watcher.start(
            move || {
                let _ = fired_sender.send(());
            },
            Duration::from_millis(10),
        );

        assert!(
            fired_receiver.recv_timeout(Duration::from_secs(2)).is_ok(),
            "oversized file should trigger the rotation callback"
        );
        watcher.stop();
    }

    #[test]
    fn test_small_file_does_not_trigger() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("2024-01-01.log");
        fs::write(&log_path, b"short").unwrap();

        let (fired_sender, fired_receiver) = bounded::<()>(16);

        let mut watcher = FileWatcher::new();
        watcher.update_settings(WatcherSettings {
            path: log_path,
            max_size_bytes: 1024,
            check_point: None,
        });
        watcher.start(
            move || {
                let _ = fired_sender.send(());
            },
            Duration::from_millis(10),
        );

        assert!(
            fired_receiver
                .recv_timeout(Duration::from_millis(200))
                .is_err(),
            "file under the threshold must not trigger"
        );
        watcher.stop();
    }

    #[test]
    fn test_settings_refresh_switches_observed_file() {
        let dir = tempfile::tempdir().unwrap();
        let small = dir.path().join("small.log");
        let big = dir.path().join("big.log");
        fs::write(&small, b"tiny").unwrap();
        fs::write(&big, vec![b'x'; 4096]).unwrap();

        let (fired_sender, fired_receiver) = bounded::<()>(16);

        let mut watcher = FileWatcher::new();
        watcher.update_settings(WatcherSettings {
            path: small,
            max_size_bytes: 1024,
            check_point: None,
        });
        let settings = watcher.settings();
        watcher.start(
            move || {
                let _ = fired_sender.send(());
            },
            Duration::from_millis(10),
        );

        assert!(fired_receiver
            .recv_timeout(Duration::from_millis(200))
            .is_err());

        settings.lock().unwrap().path = big;

        assert!(
            fired_receiver.recv_timeout(Duration::from_secs(2)).is_ok(),
            "watcher should follow the refreshed path"
        );
        watcher.stop();
    }

    #[test]
    fn test_start_twice_keeps_first_timer() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("2024-01-01.log");
        fs::write(&log_path, b"short").unwrap();

        let mut watcher = FileWatcher::new();
        watcher.update_settings(WatcherSettings {
            path: log_path,
            max_size_bytes: 1024,
            check_point: None,
        });
        watcher.start(|| {}, Duration::from_secs(60));
        assert!(watcher.is_running());
        watcher.start(|| panic!("second start must be ignored"), Duration::from_millis(1));

        std::thread::sleep(Duration::from_millis(50));
        watcher.stop();
        assert!(!watcher.is_running());
    }

    #[test]
    fn test_checkpoint_due() {
        let noon = CheckPoint {
            hour: 12,
            minute: 0,
        };
        assert!(checkpoint_due(noon, 12, 0));
        assert!(!checkpoint_due(noon, 12, 1));
        assert!(!checkpoint_due(noon, 11, 0));
    }

    #[test]
    fn test_checkpoint_parsing() {
        assert_eq!(
            "11:45".parse::<CheckPoint>().unwrap(),
            CheckPoint {
                hour: 11,
                minute: 45
            }
        );
        assert_eq!(
            "00:00".parse::<CheckPoint>().unwrap(),
            CheckPoint { hour: 0, minute: 0 }
        );
        assert!("24:00".parse::<CheckPoint>().is_err());
        assert!("12:60".parse::<CheckPoint>().is_err());
        assert!("noon".parse::<CheckPoint>().is_err());
        assert!("12".parse::<CheckPoint>().is_err());
    }

    #[test]
    fn test_checkpoint_display_pads_zeroes() {
        let early = CheckPoint { hour: 7, minute: 5 };
        assert_eq!(early.to_string(), "07:05");
    }
}
