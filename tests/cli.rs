use plotters::style::{FontDesc, FontFamily, FontStyle};
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

fn gseries(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_gseries"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("could not run gseries")
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("gseries-{}-{}", std::process::id(), name))
}

fn write_doubles(name: &str, samples: &[f64]) -> PathBuf {
    let path = temp_path(name);
    let bytes: Vec<u8> = samples.iter().flat_map(|v| v.to_ne_bytes().to_vec()).collect();
    std::fs::write(&path, bytes).unwrap();
    path
}

fn fonts_available() -> bool {
    FontDesc::new(FontFamily::SansSerif, 12., FontStyle::Normal)
        .box_size("0")
        .is_ok()
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

#[test]
fn missing_input_file_exits_with_1() {
    let out = gseries(&["/no/such/dir/series.dbl", "out.png"]);
    assert_eq!(out.status.code(), Some(1));
    let msg = stderr(&out);
    assert!(msg.contains("Cannot open /no/such/dir/series.dbl"), "{}", msg);
}

#[test]
fn unsupported_format_exits_with_1() {
    let fin = write_doubles("format.dbl", &[1., -1.]);
    let fout = temp_path("figure.pdf");
    let out = gseries(&[fin.to_str().unwrap(), fout.to_str().unwrap()]);
    std::fs::remove_file(&fin).unwrap();
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("unsupported figure format"));
    assert!(!fout.exists());
}

#[test]
fn empty_selection_exits_with_1() {
    let fin = write_doubles("empty.dbl", &[1., 2., 3.]);
    let fout = temp_path("empty.svg");
    let out = gseries(&["-s", "5", fin.to_str().unwrap(), fout.to_str().unwrap()]);
    std::fs::remove_file(&fin).unwrap();
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("no samples"));
}

#[test]
fn bad_option_values_exit_with_1() {
    for args in &[
        vec!["-lc", "nocolor", "out.svg"],
        vec!["-i", "0", "out.svg"],
        vec!["-y", "1", "-1", "/no/such/file", "out.svg"],
        vec!["-W", "wide", "out.svg"],
        vec!["-y", "-inf", "inf", "out.svg"],
        vec!["-fs", "1000000000", "out.svg"],
        vec!["-F", "100000", "out.svg"],
        vec!["-s"],
    ] {
        let out = gseries(args);
        assert_eq!(out.status.code(), Some(1), "{:?}", args);
        assert!(stderr(&out).starts_with("gseries: "), "{:?}", args);
    }
}

#[test]
fn help_lists_toolkit_options() {
    let out = gseries(&["--help"]);
    assert!(out.status.success());
    let help = String::from_utf8_lossy(&out.stdout);
    for opt in &["--xname", "--lc", "--mlw", "-y"] {
        assert!(help.contains(opt), "{} missing from help", opt);
    }
}

#[test]
fn draws_from_stdin() {
    if !fonts_available() {
        eprintln!("no sans-serif font, skipping");
        return;
    }
    let fout = temp_path("stdin.svg");
    let mut child = Command::new(env!("CARGO_BIN_EXE_gseries"))
        .args(&["-i", "2", "-g", "-ms", "3", fout.to_str().unwrap()])
        .stdin(Stdio::piped())
        .spawn()
        .unwrap();
    let bytes: Vec<u8> = (0..100)
        .map(|i| (i as f64 / 8.).sin())
        .flat_map(|v| v.to_ne_bytes().to_vec())
        .collect();
    child.stdin.take().unwrap().write_all(&bytes).unwrap();
    assert!(child.wait().unwrap().success());
    let svg = std::fs::read_to_string(&fout).unwrap();
    assert!(svg.contains("<svg"));
    std::fs::remove_file(&fout).unwrap();
}

#[test]
fn huge_samples_still_draw() {
    if !fonts_available() {
        eprintln!("no sans-serif font, skipping");
        return;
    }
    let fin = write_doubles("huge.dbl", &[1e308, -2., 3.]);
    let fout = temp_path("huge.png");
    let out = gseries(&[fin.to_str().unwrap(), fout.to_str().unwrap()]);
    std::fs::remove_file(&fin).unwrap();
    assert!(out.status.success(), "{}", stderr(&out));
    assert!(fout.exists());
    std::fs::remove_file(&fout).unwrap();
}

#[test]
fn option_value_looking_like_an_option() {
    if !fonts_available() {
        eprintln!("no sans-serif font, skipping");
        return;
    }
    let fin = write_doubles("title.dbl", &[0.5, -0.5, 1.]);
    let fout = temp_path("title.png");
    let out = gseries(&["-xname", "-lc", fin.to_str().unwrap(), fout.to_str().unwrap()]);
    std::fs::remove_file(&fin).unwrap();
    assert!(out.status.success(), "{}", stderr(&out));
    std::fs::remove_file(&fout).unwrap();
}
