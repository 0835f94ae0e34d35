/// Smoke tests to verify the binary runs without panicking
use std::process::Command;

fn wildglobe(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_wildglobe"))
        .args(args)
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .output()
        .expect("Failed to execute wildglobe")
}

/// Drop SGR escape sequences, leaving the visible text
fn strip_ansi(s: &str) -> String {
    let mut out = String::new();
    let mut in_escape = false;
    for ch in s.chars() {
        match ch {
            '\x1b' => in_escape = true,
            'm' if in_escape => in_escape = false,
            _ if in_escape => {}
            _ => out.push(ch),
        }
    }
    out
}

#[test]
fn binary_shows_help() {
    let output = wildglobe(&["--help"]);

    assert!(
        output.status.success(),
        "Binary failed to run --help: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("wildglobe"),
        "Help output should mention wildglobe"
    );
    assert!(stdout.contains("explore"));
    assert!(stdout.contains("show"));
}

#[test]
fn binary_shows_version() {
    let output = wildglobe(&["--version"]);

    assert!(
        output.status.success(),
        "Binary failed to run --version: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn invalid_subcommand_fails_gracefully() {
    let output = wildglobe(&["nonexistent-command"]);

    // Should fail with error, not panic
    assert!(
        !output.status.success(),
        "Invalid subcommand should return error status"
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        !stderr.contains("panicked at"),
        "Invalid subcommand should not cause panic"
    );
}

#[test]
fn list_prints_every_species() {
    let output = wildglobe(&["list"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), 5);
    assert!(stdout.contains("3  PND  Panda"));
    assert!(stdout.contains("Siberian Crane"));
}

#[test]
fn show_prints_a_page() {
    let output = wildglobe(&["show", "panda", "--page", "threats", "--data", "data"]);
    assert!(
        output.status.success(),
        "show failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = strip_ansi(&String::from_utf8_lossy(&output.stdout));
    assert!(stdout.contains("Threats to Survival"));
    assert!(stdout.contains("Habitat Loss"));
}

#[test]
fn show_rejects_unknown_species() {
    let output = wildglobe(&["show", "dodo"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("dodo"));
    assert!(!stderr.contains("panicked at"));
}
