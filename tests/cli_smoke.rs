use std::path::{Path, PathBuf};

use image::Rgba;

fn exe_path() -> PathBuf {
    std::env::var_os("CARGO_BIN_EXE_pfpforge")
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            let mut p = PathBuf::from("target").join("debug");
            p.push(if cfg!(windows) {
                "pfpforge.exe"
            } else {
                "pfpforge"
            });
            p
        })
}

// Flat grey studio backdrop with a red square subject; the chroma-key
// remover keys on the grey.
fn write_input_photo(path: &Path) {
    let mut img = image::RgbaImage::from_pixel(200, 160, Rgba([120, 120, 120, 255]));
    for y in 40..120 {
        for x in 50..150 {
            img.put_pixel(x, y, Rgba([200, 30, 30, 255]));
        }
    }
    img.save(path).unwrap();
}

#[test]
fn cli_generate_writes_512_png() {
    let dir = PathBuf::from("target").join("cli_smoke");
    std::fs::create_dir_all(&dir).unwrap();

    let in_path = dir.join("photo.png");
    let out_path = dir.join("pfp.png");
    write_input_photo(&in_path);
    let _ = std::fs::remove_file(&out_path);

    let in_arg = in_path.to_string_lossy().to_string();
    let out_arg = out_path.to_string_lossy().to_string();

    let status = std::process::Command::new(exe_path())
        .args(["generate", "--in", in_arg.as_str(), "--out"])
        .arg(out_arg.as_str())
        .status()
        .unwrap();

    assert!(status.success());
    let bytes = std::fs::read(&out_path).unwrap();
    let img = image::load_from_memory(&bytes).unwrap();
    assert_eq!((img.width(), img.height()), (512, 512));
}

#[test]
fn cli_backdrop_dumps_the_fixed_backdrop() {
    let dir = PathBuf::from("target").join("cli_smoke");
    std::fs::create_dir_all(&dir).unwrap();

    let out_path = dir.join("backdrop.png");
    let _ = std::fs::remove_file(&out_path);
    let out_arg = out_path.to_string_lossy().to_string();

    let status = std::process::Command::new(exe_path())
        .args(["backdrop", "--out"])
        .arg(out_arg.as_str())
        .status()
        .unwrap();

    assert!(status.success());
    let bytes = std::fs::read(&out_path).unwrap();
    let img = image::load_from_memory(&bytes).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (512, 512));
    assert!(img.pixels().all(|px| px[3] == 255));
}
