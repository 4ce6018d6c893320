use std::process::{Command, Output};

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_atlas-resource"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("atlas-resource process should run")
}

fn stdout_of(output: &Output) -> String {
    assert!(
        output.status.success(),
        "run failed: stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout.clone()).expect("stdout should be valid UTF-8")
}

#[test]
fn capacity_of_bundled_turbine_by_name() {
    let stdout = stdout_of(&run(&["capacity", "--turbine", "generic_3mw_120m"]));
    let cap = parse_metric(&stdout, "Rated capacity:", "kW");
    assert_eq!(cap, 3000.0);
}

#[test]
fn capacity_of_panel_by_path() {
    let stdout = stdout_of(&run(&[
        "capacity",
        "--panel",
        "resources/solarpanel/generic_bofinger.yaml",
    ]));
    let cap = parse_metric(&stdout, "Rated capacity:", "");
    assert!((cap - (500.0 + 0.1 * 1000f64.ln())).abs() < 1e-3, "got {cap}");
}

#[test]
fn smoothing_presets_produce_distinct_curves() {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    let default_csv = dir.path().join("default.csv");
    let sharp_csv = dir.path().join("sharp.csv");

    let default_csv_arg = default_csv.to_string_lossy().into_owned();
    let sharp_csv_arg = sharp_csv.to_string_lossy().into_owned();
    stdout_of(&run(&[
        "smooth",
        "--turbine",
        "generic_2mw_80m",
        "--out",
        &default_csv_arg,
    ]));
    stdout_of(&run(&[
        "--preset",
        "sharp",
        "smooth",
        "--turbine",
        "generic_2mw_80m",
        "--out",
        &sharp_csv_arg,
    ]));

    let default_peak = csv_peak(&default_csv);
    let sharp_peak = csv_peak(&sharp_csv);
    assert!(
        (sharp_peak - 2000.0).abs() < 1.0,
        "sharp preset should keep the nameplate peak, got {sharp_peak}"
    );
    assert!(
        default_peak < 0.96 * 2000.0,
        "default preset should derate the peak, got {default_peak}"
    );
}

#[test]
fn strict_mode_fails_on_oversmoothing() {
    let output = run(&[
        "smooth",
        "--turbine",
        "generic_2mw_80m",
        "--sigma",
        "4.0",
        "--strict",
    ]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("oversmoothed"), "stderr={stderr}");
}

#[test]
fn unknown_preset_is_an_error() {
    let output = run(&["--preset", "bogus", "list"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown preset"), "stderr={stderr}");
}

#[test]
fn list_shows_bundled_resources() {
    let stdout = stdout_of(&run(&["--config", "configs/andresen2015.toml", "list"]));
    assert!(stdout.contains("generic_2mw_80m"));
    assert!(stdout.contains("generic_csi"));
}

fn csv_peak(path: &std::path::Path) -> f64 {
    let mut rdr = csv::Reader::from_path(path).expect("curve CSV should open");
    rdr.records()
        .map(|r| {
            let rec = r.expect("row should parse");
            rec[1].parse::<f64>().expect("power should be numeric")
        })
        .fold(f64::NEG_INFINITY, f64::max)
}

fn parse_metric(stdout: &str, label: &str, unit: &str) -> f64 {
    let line = stdout
        .lines()
        .find(|line| line.trim_start().starts_with(label))
        .unwrap_or_else(|| panic!("missing line `{label}` in output: {stdout}"));

    let raw = line
        .split_once(':')
        .map(|(_, right)| right.trim())
        .unwrap_or_else(|| panic!("invalid format for line `{line}`"));

    let numeric = raw.strip_suffix(unit).unwrap_or(raw).trim();
    numeric
        .parse::<f64>()
        .unwrap_or_else(|_| panic!("failed parsing `{numeric}` from line `{line}`"))
}
