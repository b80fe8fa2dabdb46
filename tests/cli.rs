//! Drives the `walkforward` binary end to end.

use assert_cmd::Command;
use assert_fs::prelude::*;
use predicates::prelude::*;

fn series_csv(dir: &assert_fs::TempDir, name: &str, len: usize) -> assert_fs::fixture::ChildPath {
    let file = dir.child(name);
    let mut body = String::from("date,close\n");
    for i in 0..len {
        body.push_str(&format!("d{},{}\n", i, 50.0 + (i % 10) as f64));
    }
    file.write_str(&body).unwrap();
    file
}

fn walkforward(dir: &assert_fs::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("walkforward").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("WALKFORWARD_WINDOW_SIZE")
        .env_remove("WALKFORWARD_HORIZON")
        .env_remove("WALKFORWARD_DATA")
        .env("XDG_CONFIG_HOME", dir.path())
        .env("WALKFORWARD_LOG", "warn")
        .env("NO_COLOR", "1")
        .env("CLICOLOR", "0");
    cmd
}

#[test]
fn run_writes_report_and_exports() {
    let dir = assert_fs::TempDir::new().unwrap();
    let data = series_csv(&dir, "series.csv", 200);
    let report = dir.child("report.json");
    let records = dir.child("windows.csv");
    let fitted = dir.child("fitted.csv");

    walkforward(&dir)
        .args(["run", "--model", "naive", "--no-progress", "--data"])
        .arg(data.path())
        .arg("--output")
        .arg(report.path())
        .arg("--records")
        .arg(records.path())
        .arg("--fitted")
        .arg(fitted.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("WALK-FORWARD REPORT"))
        .stdout(predicate::str::contains("Windows scored    : 11"));

    report.assert(predicate::str::contains("\"windows_scored\": 11"));
    records.assert(predicate::str::contains("window,train_start"));
    fitted.assert(predicate::str::starts_with("position,fitted"));
}

#[test]
fn run_writes_prometheus_metrics() {
    let dir = assert_fs::TempDir::new().unwrap();
    let data = series_csv(&dir, "series.csv", 200);
    let metrics = dir.child("metrics.prom");

    walkforward(&dir)
        .args(["run", "--model", "naive", "--no-progress", "--data"])
        .arg(data.path())
        .arg("--metrics")
        .arg(metrics.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Metrics written to"));

    metrics.assert(predicate::str::contains("walkforward_windows_scored 11"));
    metrics.assert(predicate::str::contains("walkforward_fit_ms_count 11"));
    metrics.assert(predicate::str::contains("walkforward_windows_failed").not());
}

#[test]
fn short_series_reports_no_data() {
    let dir = assert_fs::TempDir::new().unwrap();
    let data = series_csv(&dir, "short.csv", 50);

    walkforward(&dir)
        .args(["run", "--no-progress", "--data"])
        .arg(data.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("no data"));
}

#[test]
fn zero_horizon_is_fatal() {
    let dir = assert_fs::TempDir::new().unwrap();
    let data = series_csv(&dir, "series.csv", 200);

    walkforward(&dir)
        .args(["run", "--horizon", "0", "--data"])
        .arg(data.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("horizon must be > 0"));
}

#[test]
fn init_then_run_from_config() {
    let dir = assert_fs::TempDir::new().unwrap();
    let data = series_csv(&dir, "series.csv", 150);

    walkforward(&dir).arg("init").assert().success();
    dir.child("walkforward.toml").assert(predicate::str::contains("window_size = 120"));

    // a second init refuses to overwrite
    walkforward(&dir).arg("init").assert().failure();

    walkforward(&dir)
        .args(["run", "--no-progress", "--window-size", "100", "--horizon", "10", "--data"])
        .arg(data.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Windows attempted : 5"));
}

#[test]
fn print_default_config() {
    let dir = assert_fs::TempDir::new().unwrap();
    walkforward(&dir)
        .arg("--print-default-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("horizon = 7"))
        .stdout(predicate::str::contains("kind = \"ses\""));
}
