// Drives the compiled binary through a PTY: the real event loop, raw mode
// and mouse capture setup/teardown.
//
// Requires a TTY; ignored by default.
// Run manually via: `cargo test --test integration_min_session -- --ignored`.

#![cfg(unix)]

use std::time::Duration;

use expectrl::{spawn, Eof};

#[test]
#[ignore]
fn start_then_quit_restores_terminal() -> Result<(), Box<dyn std::error::Error>> {
    let home = tempfile::tempdir()?;
    let bin = assert_cmd::cargo::cargo_bin("flick");
    let cmd = format!(
        "env HOME={0} XDG_CONFIG_HOME={0} {1} -d 1 -p pty",
        home.path().display(),
        bin.display()
    );

    let mut p = spawn(cmd)?;
    std::thread::sleep(Duration::from_millis(200));

    // start the countdown, then bail out mid-session
    p.send(" ")?;
    std::thread::sleep(Duration::from_millis(300));
    p.send("\x1b")?; // ESC

    p.expect(Eof)?;
    Ok(())
}
