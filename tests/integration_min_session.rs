// Drives the compiled binary through a PTY: the real event loop, crossterm
// input handling and terminal setup/teardown.
//
// Notes:
// - Requires a TTY; uses expectrl which allocates a pseudo terminal.
// - Marked Unix-only and ignored by default to avoid CI/platform issues.
// - Run manually via: `cargo test --test integration_min_session -- --ignored`.

#![cfg(unix)]

use std::time::Duration;

use expectrl::{spawn, Eof};

#[test]
#[ignore]
fn minimal_session_completes_and_exits() -> Result<(), Box<dyn std::error::Error>> {
    let bin = assert_cmd::cargo::cargo_bin("cadence");
    let cmd = format!("{} type -p hi", bin.display());

    let mut p = spawn(cmd)?;

    // let the alternate screen come up
    std::thread::sleep(Duration::from_millis(200));

    p.send("hi")?;
    std::thread::sleep(Duration::from_millis(200));

    p.send("\x1b")?; // ESC

    p.expect("wpm")?;
    p.expect(Eof)?;
    Ok(())
}
