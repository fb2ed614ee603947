//! End-to-end scenarios through a running logger.
//!
//! # What this covers
//!
//! - **Independent thresholds**: console and file filter by their own level.
//! - **Output method matrix**: `method` 1, 2, 3 and anything else select the
//!   file, the console, both or neither.
//! - **Unwritable file**: the file sink is dropped for the epoch and a CRIT
//!   line says so on the console.
//! - **Failed write**: a record that cannot be written does not switch the
//!   file sink off; the next record is retried against the same path.
//! - **Settings from TOML**: a `[log]` table drives a real logger, and a
//!   reload picks up edits to the file.
//!
//! # Running
//!
//! ```sh
//! cargo test --test scenario_harness
//! ```

mod common;
use common::*;
use fanlog::{FileSettings, Level};
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::fs;

// ---------------------------------------------------------------------------
// Thresholds
// ---------------------------------------------------------------------------

#[test]
fn console_and_file_filter_independently() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.log");
    let h = start(
        SettingsBuilder::new()
            .file(&path)
            .print_lvl("warn")
            .file_lvl("debug")
            .build(),
    );

    let log = h.logger.handle("A");
    log.debug("x1");
    log.warn("x2");
    let console = h.finish();

    assert_eq!(console.messages_from("A"), vec!["x2"]);
    let file = read_lines(&path);
    assert_eq!(messages_from(&file, "A"), vec!["x1", "x2"]);
    assert!(file.iter().any(|l| l.ends_with(" DEBUG A: x1")));
    assert!(file.iter().any(|l| l.ends_with(" WARNING A: x2")));
}

#[test]
fn nested_names_render_as_chain() {
    let h = start(SettingsBuilder::new().build());
    h.logger
        .handle("Main")
        .child("Net")
        .module("Tcp", "listening", Level::Info);
    let console = h.finish();
    assert_eq!(console.messages_from("Main->Net->Tcp"), vec!["listening"]);
}

// ---------------------------------------------------------------------------
// Output method
// ---------------------------------------------------------------------------

#[rstest]
#[case::file_only(1, false, true)]
#[case::console_only(2, true, false)]
#[case::both(3, true, true)]
#[case::none(0, false, false)]
#[case::unknown(4, false, false)]
fn method_selects_sinks(#[case] method: i64, #[case] console_on: bool, #[case] file_on: bool) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.log");
    let h = start(SettingsBuilder::new().file(&path).method(method).build());

    h.logger.handle("M").error("ping");
    let console = h.finish();

    assert_eq!(console.messages_from("M") == vec!["ping"], console_on);
    assert_eq!(messages_from(&read_lines(&path), "M") == vec!["ping"], file_on);
    if !console_on {
        assert_eq!(console.raw_text(), "");
    }
    if !file_on {
        assert!(!path.exists());
    }
}

// ---------------------------------------------------------------------------
// Unwritable file
// ---------------------------------------------------------------------------

#[test]
fn unwritable_path_warns_on_console() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing-dir").join("app.log");
    let h = start(SettingsBuilder::new().file(&path).build());

    h.logger.handle("A").info("still printed");
    let console = h.finish();

    assert_eq!(console.messages_from("A"), vec!["still printed"]);
    let expected = format!(
        "Logging to {} is impossible - no write permission. Fix it",
        path.display()
    );
    assert!(console.messages_from("Logger").contains(&expected));
    assert!(console.raw_text().contains("\x1b[95mLogging to"));
    assert!(!path.exists());
}

/// `/dev/full` accepts the open but fails every write. Once the link points
/// at a real file again, the next record lands there without a reload.
#[cfg(target_os = "linux")]
#[test]
fn failed_write_retries_on_next_record() {
    let dir = tempfile::tempdir().unwrap();
    let link = dir.path().join("app.log");
    let real = dir.path().join("real.log");
    std::os::unix::fs::symlink("/dev/full", &link).unwrap();

    let h = start(SettingsBuilder::new().file(&link).file_lvl("info").build());
    let log = h.logger.handle("A");
    log.info("first");
    // Console only; once it shows, the file attempt for "first" is done.
    log.debug("synced");
    wait_until(|| h.console.messages_from("A") == vec!["first", "synced"]);

    fs::remove_file(&link).unwrap();
    std::os::unix::fs::symlink(&real, &link).unwrap();
    log.info("second");
    h.finish();

    assert_eq!(messages_from(&read_lines(&real), "A"), vec!["second"]);
}

// ---------------------------------------------------------------------------
// TOML settings
// ---------------------------------------------------------------------------

#[test]
fn toml_file_drives_logger_and_reload() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("app.log");
    let config_path = dir.path().join("fanlog.toml");
    let write_config = |print_lvl: &str| {
        fs::write(
            &config_path,
            format!(
                "[log]\nprint_lvl = \"{print_lvl}\"\nfile_lvl = \"info\"\nmethod = 3\nremote_log = false\nfile = \"{}\"\n",
                log_path.display()
            ),
        )
        .unwrap();
    };

    write_config("debug");
    let h = start(FileSettings::new(&config_path));
    let log = h.logger.handle("Cfg");
    log.debug("loud");

    write_config("error");
    h.logger.reload();
    log.debug("quiet");
    log.info("filed only");

    let console = h.finish();
    assert_eq!(console.messages_from("Cfg"), vec!["loud"]);
    assert_eq!(
        messages_from(&read_lines(&log_path), "Cfg"),
        vec!["filed only"]
    );
}

#[test]
fn broken_toml_keeps_previous_settings() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("fanlog.toml");
    fs::write(&config_path, "[log]\nprint_lvl = \"warn\"\nmethod = 2\n").unwrap();

    let h = start(FileSettings::new(&config_path));
    fs::write(&config_path, "[log\nprint_lvl = ").unwrap();
    h.logger.reload();
    let log = h.logger.handle("Cfg");
    log.info("filtered");
    log.warn("kept");

    let console = h.finish();
    assert_eq!(console.messages_from("Cfg"), vec!["kept"]);
}
