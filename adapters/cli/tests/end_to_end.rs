use std::{
    fs,
    io::Write,
    path::PathBuf,
    process::{Command, Output, Stdio},
};

const HANDSHAKE: &str = "0 0\n3\n";

const QUIET_TURN: &str = "\
3 0
3 0
6
0 1 1131 1131 0 0 -1 -1 -1 -1 -1
1 1 1414 849 0 0 -1 -1 -1 -1 -1
2 1 849 1414 0 0 -1 -1 -1 -1 -1
3 2 16499 7869 0 0 -1 -1 -1 -1 -1
4 2 16216 8151 0 0 -1 -1 -1 -1 -1
5 2 16781 7586 0 0 -1 -1 -1 -1 -1
";

const THREAT_TURN: &str = "\
3 20
3 10
4
0 1 1131 1131 0 0 -1 -1 -1 -1 -1
1 1 1414 849 0 0 -1 -1 -1 -1 -1
2 1 849 1414 0 0 -1 -1 -1 -1 -1
12 0 2500 2000 0 0 14 -285 -281 1 1
";

fn run(args: &[&str], input: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_hero-defence"))
        .args(args)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to launch hero-defence binary");

    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(input.as_bytes())
        .expect("failed to feed referee input");

    child.wait_with_output().expect("binary terminates")
}

fn stdout_lines(output: &Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_owned)
        .collect()
}

#[test]
fn plays_scripted_game_until_input_closes() {
    let input = format!("{HANDSHAKE}{QUIET_TURN}{THREAT_TURN}");
    let output = run(&[], &input);

    assert!(
        output.status.success(),
        "binary failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(
        stdout_lines(&output),
        vec![
            "MOVE 3535 3535",
            "MOVE 4850 1500",
            "MOVE 1500 4850",
            "SPELL CONTROL 12 17630 9000",
            "MOVE 2500 2000",
            "MOVE 2500 2000",
        ]
    );
}

#[test]
fn malformed_turn_exits_with_error() {
    let input = format!("{HANDSHAKE}3 20\n3 10\n2\n0 1 1131 1131 0 0\n");
    let output = run(&[], &input);

    assert!(!output.status.success(), "malformed input must be fatal");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("failed to read turn 1"),
        "unexpected stderr: {stderr}"
    );
    assert!(stdout_lines(&output).is_empty());
}

#[test]
fn policy_file_changes_guard_layout() {
    let path: PathBuf = std::env::temp_dir().join(format!(
        "hero-defence-policy-{}.toml",
        std::process::id()
    ));
    fs::write(
        &path,
        "version = 1\n[defence]\nguard_points = [[2000, 2000]]\nsurplus = \"wait\"\n",
    )
    .expect("write policy file");

    let input = format!("{HANDSHAKE}{QUIET_TURN}");
    let policy = path.to_string_lossy().into_owned();
    let output = run(&["--policy", &policy], &input);
    let _ = fs::remove_file(&path);

    assert!(
        output.status.success(),
        "binary failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(
        stdout_lines(&output),
        vec!["MOVE 2000 2000", "WAIT", "WAIT"]
    );
}
