#![cfg(unix)]

use minish::{Disposition, ExpansionContext, Interpreter, expand_word, split_into_words};
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

fn make_unique_temp_dir(tag: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let dir = std::env::temp_dir().join(format!(
        "minish_it_{}_{}_{}",
        tag,
        std::process::id(),
        nanos
    ));
    fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn shell_in(dir: &PathBuf) -> Interpreter {
    let mut sh = Interpreter::default();
    sh.env_mut().current_dir = dir.clone();
    sh
}

fn read(dir: &PathBuf, name: &str) -> String {
    fs::read_to_string(dir.join(name)).unwrap_or_else(|e| panic!("reading {}: {}", name, e))
}

macro_rules! split_test {
    ($name:ident, $line:expr, [$($word:expr),*]) => {
        #[test]
        fn $name() {
            let expected: Vec<&str> = vec![$($word),*];
            assert_eq!(split_into_words($line), expected, "line: {:?}", $line);
        }
    };
}

// ── Word splitting ──

split_test!(split_simple, "echo hello world\n", ["echo", "hello", "world"]);
split_test!(split_escaped_space, "a\\ b c", ["a\\ b", "c"]);
split_test!(split_comment, "foo # bar baz", ["foo"]);
split_test!(split_leading_blanks, "\t  ls", ["ls"]);
split_test!(split_redirect_tokens, "sort < in > out", ["sort", "<", "in", ">", "out"]);

#[test]
fn split_600_tokens_keeps_512() {
    let line = vec!["t"; 600].join(" ");
    assert_eq!(split_into_words(&line).len(), 512);
}

// ── Expansion ──

#[test]
fn expand_pid_of_current_process() {
    let ctx = ExpansionContext::for_current_process();
    assert_eq!(expand_word("pid=$$", &ctx), format!("pid={}", std::process::id()));
}

// ── End to end ──

#[test]
fn redirect_output_then_status_is_zero() {
    let dir = make_unique_temp_dir("echo");
    let mut sh = shell_in(&dir);

    assert!(!dir.join("out.txt").exists());
    let res = sh.run_line("echo hi > out.txt\n").unwrap();
    assert_eq!(res, Some(Disposition::Exited(0)));
    assert_eq!(read(&dir, "out.txt"), "hi\n");

    sh.run_line("echo $? > status.txt").unwrap();
    assert_eq!(read(&dir, "status.txt"), "0\n");
    let _ = fs::remove_dir_all(dir);
}

#[test]
fn exit_status_of_previous_command_is_expanded() {
    let dir = make_unique_temp_dir("status");
    fs::write(dir.join("seven.sh"), "exit 7\n").unwrap();
    let mut sh = shell_in(&dir);

    let res = sh.run_line("sh seven.sh").unwrap();
    assert_eq!(res, Some(Disposition::Exited(7)));
    sh.run_line("echo status=$? > status.txt").unwrap();
    assert_eq!(read(&dir, "status.txt"), "status=7\n");
    let _ = fs::remove_dir_all(dir);
}

#[test]
fn background_command_returns_immediately() {
    let dir = make_unique_temp_dir("bg");
    let mut sh = shell_in(&dir);

    let started = Instant::now();
    let res = sh.run_line("sleep 5 &").unwrap();
    assert!(started.elapsed() < Duration::from_secs(5), "background command blocked");
    let pid = match res {
        Some(Disposition::Background(pid)) => pid,
        other => panic!("expected background disposition, got {:?}", other),
    };
    assert_eq!(sh.env().last_background_pid, Some(pid));

    sh.run_line("echo $! > bg.txt").unwrap();
    assert_eq!(read(&dir, "bg.txt"), format!("{}\n", pid));
    let _ = fs::remove_dir_all(dir);
}

#[test]
fn special_parameters_reach_the_program() {
    let dir = make_unique_temp_dir("params");
    let mut sh = shell_in(&dir);

    sh.run_line("echo $$ x=${NAME} $x > params.txt").unwrap();
    assert_eq!(
        read(&dir, "params.txt"),
        format!("{} x=<Parameter: NAME> $x\n", std::process::id())
    );
    let _ = fs::remove_dir_all(dir);
}

#[test]
fn append_then_read_back_through_stdin() {
    let dir = make_unique_temp_dir("append");
    let mut sh = shell_in(&dir);

    sh.run_line("echo one > log.txt").unwrap();
    sh.run_line("echo two >> log.txt").unwrap();
    sh.run_line("wc -l < log.txt > count.txt").unwrap();
    assert_eq!(read(&dir, "log.txt"), "one\ntwo\n");
    assert_eq!(read(&dir, "count.txt").trim(), "2");
    let _ = fs::remove_dir_all(dir);
}

#[test]
fn failed_redirection_does_not_end_the_shell() {
    let dir = make_unique_temp_dir("badredir");
    let mut sh = shell_in(&dir);

    let res = sh.run_line("cat < missing.txt").unwrap();
    assert_eq!(res, Some(Disposition::LaunchFailed));
    assert_eq!(sh.env().last_status, Some(1));

    let res = sh.run_line("echo >").unwrap();
    assert_eq!(res, Some(Disposition::LaunchFailed));

    let res = sh.run_line("echo still alive > alive.txt").unwrap();
    assert_eq!(res, Some(Disposition::Exited(0)));
    assert_eq!(read(&dir, "alive.txt"), "still alive\n");
    let _ = fs::remove_dir_all(dir);
}

#[test]
fn comment_after_command_is_ignored() {
    let dir = make_unique_temp_dir("comment");
    let mut sh = shell_in(&dir);

    sh.run_line("echo kept > c.txt # echo dropped").unwrap();
    assert_eq!(read(&dir, "c.txt"), "kept\n");
    let _ = fs::remove_dir_all(dir);
}

#[test]
fn script_runs_every_line() {
    let dir = make_unique_temp_dir("script");
    let mut sh = shell_in(&dir);

    let script = "echo first > s.txt\n\n# comment\necho second >> s.txt\n";
    sh.run_script(script.as_bytes()).unwrap();
    assert_eq!(read(&dir, "s.txt"), "first\nsecond\n");
    let _ = fs::remove_dir_all(dir);
}
