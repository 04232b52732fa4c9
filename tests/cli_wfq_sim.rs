use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!(
        "wfq-sim-{prefix}-{}-{nanos}",
        std::process::id()
    ));
    fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn write_file(dir: &PathBuf, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write temp file");
    path
}

#[test]
fn dispatches_two_equal_weight_flows_in_arrival_order() {
    let dir = unique_temp_dir("basic");
    let input = write_file(
        &dir,
        "trace.txt",
        "0 1.1.1.1 1 2.2.2.2 2 100\n0 3.3.3.3 3 4.4.4.4 4 100\n",
    );
    let out_path = dir.join("out.txt");

    let output = Command::new(env!("CARGO_BIN_EXE_wfq_sim"))
        .args([
            "--input",
            input.to_str().unwrap(),
            "--output",
            out_path.to_str().unwrap(),
        ])
        .output()
        .expect("run wfq_sim");
    assert!(
        output.status.success(),
        "wfq_sim failed: stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );

    let contents = fs::read_to_string(&out_path).expect("read output file");
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "0: 0 1.1.1.1 1 2.2.2.2 2 100");
    assert_eq!(lines[1], "100: 0 3.3.3.3 3 4.4.4.4 4 100");

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn reads_from_stdin_and_writes_to_stdout_when_no_paths_given() {
    let mut child = Command::new(env!("CARGO_BIN_EXE_wfq_sim"))
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn wfq_sim");

    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(b"0 1.1.1.1 1 2.2.2.2 2 50\n")
        .expect("write to stdin");

    let output = child.wait_with_output().expect("wait for wfq_sim");
    assert!(
        output.status.success(),
        "wfq_sim failed: stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8(output.stdout).expect("utf8 stdout");
    assert_eq!(stdout.trim_end(), "0: 0 1.1.1.1 1 2.2.2.2 2 50");
}

#[test]
fn malformed_input_line_exits_with_failure_and_reports_line_number() {
    let dir = unique_temp_dir("malformed");
    let input = write_file(&dir, "trace.txt", "0 1.1.1.1 1 2.2.2.2 2 100\nnot a valid line\n");

    let output = Command::new(env!("CARGO_BIN_EXE_wfq_sim"))
        .args(["--input", input.to_str().unwrap()])
        .output()
        .expect("run wfq_sim");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("wfq-sim:"),
        "expected error message on stderr, got: {stderr}"
    );

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn max_flows_cap_below_distinct_flows_fails_the_run() {
    let dir = unique_temp_dir("cap");
    let input = write_file(
        &dir,
        "trace.txt",
        "0 10.0.0.1 1 10.0.0.2 2 10\n\
         0 10.0.0.3 1 10.0.0.4 2 10\n\
         0 10.0.0.5 1 10.0.0.6 2 10\n",
    );

    let output = Command::new(env!("CARGO_BIN_EXE_wfq_sim"))
        .args(["--input", input.to_str().unwrap(), "--max-flows", "2"])
        .output()
        .expect("run wfq_sim");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("wfq-sim:"));

    let _ = fs::remove_dir_all(&dir);
}
