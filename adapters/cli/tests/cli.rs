use std::process::{Command, Output};

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_probable-journey"))
        .args(args)
        .output()
        .expect("binary runs")
}

#[test]
fn seeded_run_reports_rooms_and_draws_the_map() {
    let output = run(&["--seed", "7", "--rooms", "3", "--no-path"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "{output:?}");
    assert!(stdout.starts_with("seed 7: "), "{stdout}");
    assert!(stdout.contains("of 3 rooms"), "{stdout}");
    assert!(stdout.contains("S start"), "{stdout}");
    // summary, 45 map rows, legend
    assert_eq!(stdout.lines().count(), 47, "{stdout}");
}

#[test]
fn same_seed_draws_the_same_dungeon() {
    let first = run(&["--seed", "11", "--no-path"]);
    let second = run(&["--seed", "11", "--no-path"]);

    assert!(first.status.success(), "{first:?}");
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn start_outside_the_dungeon_is_rejected() {
    let output = run(&["--seed", "7", "--from", "0,0"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("start tile 0,0 is not floor or hall"), "{stderr}");
}
