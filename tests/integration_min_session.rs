// Drives the compiled binary through a PTY: raw mode, the alternate screen
// and crossterm input handling all take part.
//
// Notes:
// - Requires a TTY; uses expectrl which allocates a pseudo terminal.
// - Unix-only and ignored by default.
// - Run manually via: `cargo test --test integration_min_session -- --ignored`.

#![cfg(unix)]

use std::time::Duration;

use expectrl::{spawn, Eof};

fn command(args: &str) -> Result<String, Box<dyn std::error::Error>> {
    let bin = assert_cmd::cargo::cargo_bin("typemaster");
    let dir = tempfile::tempdir()?.into_path();
    Ok(format!(
        "{} --history {} --config {} {}",
        bin.display(),
        dir.join("history.json").display(),
        dir.join("config.json").display(),
        args
    ))
}

#[test]
#[ignore]
fn single_test_can_be_cancelled() -> Result<(), Box<dyn std::error::Error>> {
    let mut p = spawn(command("-m line")?)?;

    // Give the app a moment to set up the alternate screen
    std::thread::sleep(Duration::from_millis(200));

    p.send("ab")?;
    std::thread::sleep(Duration::from_millis(200));

    // ESC leaves the session without results
    p.send("\x1b")?;

    p.expect(Eof)?;
    Ok(())
}

#[test]
#[ignore]
fn menu_quits_on_escape() -> Result<(), Box<dyn std::error::Error>> {
    let mut p = spawn(command("")?)?;
    std::thread::sleep(Duration::from_millis(200));

    p.send("\x1b")?;

    p.expect(Eof)?;
    Ok(())
}

#[test]
#[ignore]
fn stats_dashboard_closes_on_any_key() -> Result<(), Box<dyn std::error::Error>> {
    let mut p = spawn(command("--stats")?)?;
    std::thread::sleep(Duration::from_millis(200));

    p.send(" ")?;

    p.expect(Eof)?;
    Ok(())
}
