use std::process::{Command, Output};

fn lane_siege(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_lane-siege"))
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .expect("failed to launch lane-siege")
}

#[test]
fn short_match_reports_opening_orders_in_summary() {
    let output = lane_siege(&["--place", "walker@0:1", "--max-seconds", "1"]);

    assert!(output.status.success(), "lane-siege exited with {}", output.status);
    let stdout = String::from_utf8(output.stdout).expect("stdout is utf-8");
    assert!(stdout.contains("No winner"), "unexpected summary:\n{stdout}");
    assert!(
        stdout.contains("Player: wall 2500 / 2500, bolts 100, living units 1"),
        "unexpected summary:\n{stdout}"
    );
    assert!(
        stdout.contains("Opponent: wall 2500 / 2500, bolts 200, living units 0"),
        "unexpected summary:\n{stdout}"
    );
}

#[test]
fn refused_orders_leave_the_balance_untouched() {
    let output = lane_siege(&[
        "--place",
        "dragon@0:1",
        "--place",
        "ranger@0:9",
        "--max-seconds",
        "1",
    ]);

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("stdout is utf-8");
    assert!(
        stdout.contains("Player: wall 2500 / 2500, bolts 200, living units 0"),
        "unexpected summary:\n{stdout}"
    );
}

#[test]
fn malformed_orders_fail_argument_parsing() {
    let output = lane_siege(&["--place", "walker"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).expect("stderr is utf-8");
    assert!(stderr.contains("kind@lane:column"), "unexpected error:\n{stderr}");
}
