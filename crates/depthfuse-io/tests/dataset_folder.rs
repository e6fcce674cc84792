use depthfuse_core::synthetic::scene::{poses_orbit, render_views, Sphere};
use depthfuse_core::test_utils::{axis_aligned_grid, centered_intrinsics};
use depthfuse_core::{CalibratedView, Pt3};
use depthfuse_engine::FusionEngine;
use depthfuse_io::{load_dataset, save_dataset, write_structured_grid, DatasetConfig};
use std::fs;

fn views() -> Vec<CalibratedView> {
    let k = centered_intrinsics(30.0, 24, 18);
    let sphere = Sphere {
        center: Pt3::origin(),
        radius: 1.0,
    };
    render_views(&k, &poses_orbit(3, &Pt3::origin(), 4.0, 0.0), 24, 18, &sphere, None).unwrap()
}

#[test]
fn saved_dataset_loads_back() {
    let dir = tempfile::tempdir().unwrap();
    let views = views();
    let config = save_dataset(dir.path(), &views).unwrap();
    let dataset = load_dataset(&config).unwrap();

    assert!(dataset.skipped.is_empty());
    assert_eq!(dataset.views.len(), views.len());
    for (a, b) in views.iter().zip(&dataset.views) {
        assert_eq!(a.depth_map(), b.depth_map());
        assert_eq!(a.intrinsic(), b.intrinsic());
        assert_eq!(a.pose(), b.pose());
    }
}

#[test]
fn list_entries_keep_only_file_names() {
    let dir = tempfile::tempdir().unwrap();
    let config = save_dataset(dir.path(), &views()).unwrap();
    let list_path = dir.path().join(&config.depth_map_file);
    let rewritten: String = fs::read_to_string(&list_path)
        .unwrap()
        .lines()
        .map(|name| format!("/some/other/machine/{name}\n\n"))
        .collect();
    fs::write(&list_path, rewritten).unwrap();

    assert_eq!(load_dataset(&config).unwrap().views.len(), 3);
}

#[test]
fn unreadable_calibration_skips_the_view() {
    let dir = tempfile::tempdir().unwrap();
    let config = save_dataset(dir.path(), &views()).unwrap();
    fs::remove_file(dir.path().join("camera_0001.krtd")).unwrap();
    fs::write(dir.path().join("camera_0002.krtd"), "not a camera\n").unwrap();

    let dataset = load_dataset(&config).unwrap();
    assert_eq!(dataset.views.len(), 1);
    let skipped: Vec<usize> = dataset.skipped.iter().map(|s| s.index).collect();
    assert_eq!(skipped, vec![1, 2]);
}

#[test]
fn dataset_errors() {
    let dir = tempfile::tempdir().unwrap();
    let config = save_dataset(dir.path(), &views()).unwrap();

    // Every calibration unreadable: nothing to fuse.
    for i in 0..3 {
        fs::remove_file(dir.path().join(format!("camera_{i:04}.krtd"))).unwrap();
    }
    assert!(load_dataset(&config).is_err());

    // Lists of different lengths.
    let config = save_dataset(dir.path(), &views()).unwrap();
    fs::write(dir.path().join(&config.krt_file), "camera_0000.krtd\n").unwrap();
    let err = load_dataset(&config).unwrap_err();
    assert!(format!("{err:#}").contains("calibration files"));

    // Corrupt depth map is fatal.
    let config = save_dataset(dir.path(), &views()).unwrap();
    fs::write(dir.path().join("depth_0000.json"), "{").unwrap();
    assert!(load_dataset(&config).is_err());

    assert!(load_dataset(&DatasetConfig::default()).is_err());
}

#[test]
fn fused_dataset_writes_a_structured_grid() {
    let dir = tempfile::tempdir().unwrap();
    let config = save_dataset(&dir.path().join("data"), &views()).unwrap();
    let dataset = load_dataset(&config).unwrap();
    let grid = axis_aligned_grid([4, 3, 2], 0.5, Pt3::new(-1.0, -0.5, -0.25));
    let result = FusionEngine::configure(0.5, 1.0, true)
        .unwrap()
        .run(&grid, &dataset.views)
        .unwrap();

    let out = dir.path().join("out.vts");
    write_structured_grid(&out, &result).unwrap();
    let text = fs::read_to_string(&out).unwrap();
    assert!(text.starts_with("<?xml"));
    assert!(text.contains(r#"WholeExtent="0 3 0 2 0 1""#));
    let count_values = text
        .split(r#"Name="observation_count" format="ascii">"#)
        .nth(1)
        .and_then(|rest| rest.split("</DataArray>").next())
        .unwrap()
        .split_whitespace()
        .count();
    assert_eq!(count_values, 24);
}
