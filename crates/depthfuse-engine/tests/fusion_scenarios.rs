use depthfuse_core::synthetic::noise::UniformDepthNoise;
use depthfuse_core::synthetic::scene::{poses_orbit, render_views, Sphere};
use depthfuse_core::test_utils::{axis_aligned_grid, centered_intrinsics, constant_depth_view};
use depthfuse_core::{
    rigid_matrix, CalibratedView, FxFyCxCySkew, GridBasis, GridError, Mat3, Mat4, Pt3, Real,
    Vec3, VoxelGridDescriptor,
};
use depthfuse_engine::{observe, FusionConfig, FusionEngine, FusionError, ResultGrid};

fn approx_eq(a: Real, b: Real, tol: Real) {
    assert!(
        (a - b).abs() <= tol,
        "values differ: {} vs {} (tol={})",
        a,
        b,
        tol
    );
}

fn fuse(grid: &VoxelGridDescriptor, views: &[CalibratedView], parallel: bool) -> ResultGrid {
    FusionEngine::configure(2.0, 3.0, parallel)
        .unwrap()
        .run(grid, views)
        .unwrap()
}

fn sphere_views() -> Vec<CalibratedView> {
    let k = centered_intrinsics(50.0, 40, 30);
    let sphere = Sphere {
        center: Pt3::origin(),
        radius: 1.0,
    };
    let noise = UniformDepthNoise {
        seed: 3,
        max_abs: 0.02,
    };
    let poses = poses_orbit(6, &Pt3::origin(), 4.0, 0.5);
    render_views(&k, &poses, 40, 30, &sphere, Some(&noise)).unwrap()
}

#[test]
fn two_by_two_by_two_scenario() {
    // Camera at (0, 0, -4) looking along +z.
    let k = FxFyCxCySkew::new(4.0, 4.0, 0.0, 0.0).k_matrix();
    let pose = rigid_matrix(&Mat3::identity(), &Vec3::new(0.0, 0.0, 4.0));
    let views = vec![constant_depth_view(&k, &pose, 1, 1, 5.0)];
    let grid = axis_aligned_grid([2, 2, 2], 1.0, Pt3::origin());

    for parallel in [false, true] {
        let result = fuse(&grid, &views, parallel);
        // ray depth 4 vs observed 5: in band, in front of the surface
        assert_eq!(result.count(0, 0, 0), 1);
        approx_eq(result.potential(0, 0, 0).unwrap(), -1.5, 1e-12);
        // exactly on the surface
        assert_eq!(result.count(0, 0, 1), 1);
        approx_eq(result.potential(0, 0, 1).unwrap(), 0.0, 1e-12);
        // every voxel with i = 1 or j = 1 projects outside the 1x1 image
        for k in 0..2 {
            for (i, j) in [(1, 0), (0, 1), (1, 1)] {
                assert_eq!(result.count(i, j, k), 0);
                assert_eq!(result.potential(i, j, k), None);
            }
        }
    }
}

#[test]
fn column_through_a_surface_saturates_on_both_sides() {
    let k = FxFyCxCySkew::new(1.0, 1.0, 0.0, 0.0).k_matrix();
    let views = vec![constant_depth_view(&k, &Mat4::identity(), 1, 1, 5.0)];
    let grid = axis_aligned_grid([1, 1, 12], 1.0, Pt3::new(0.0, 0.0, 1.0));
    let result = fuse(&grid, &views, false);

    let expected = [
        -3.0, -3.0, -3.0, -1.5, 0.0, 1.5, 3.0, 3.0, 3.0, 3.0, 3.0, 3.0,
    ];
    for (k, want) in expected.iter().enumerate() {
        approx_eq(result.potential(0, 0, k).unwrap(), *want, 1e-12);
    }
}

#[test]
fn sequential_and_parallel_are_bit_identical() {
    let views = sphere_views();
    let grid = VoxelGridDescriptor::new(
        [13, 11, 9],
        Vec3::new(0.25, 0.3, 0.35),
        Pt3::new(-1.5, -1.5, -1.4),
        GridBasis::identity(),
    );
    let seq = fuse(&grid, &views, false);
    let par = fuse(&grid, &views, true);
    let pooled = FusionEngine::from_config(&FusionConfig {
        threads: Some(3),
        ..FusionConfig::default()
    })
    .unwrap()
    .run(&grid, &views)
    .unwrap();

    for other in [&par, &pooled] {
        assert_eq!(seq.counts(), other.counts());
        for (a, b) in seq.potentials().iter().zip(other.potentials()) {
            assert_eq!(a.to_bits(), b.to_bits());
        }
    }
    assert!(seq.stats().observed > 0);
}

#[test]
fn counts_match_direct_projection_and_frustum() {
    let views = sphere_views();
    let grid = axis_aligned_grid([7, 7, 7], 0.5, Pt3::new(-1.5, -1.5, -1.5));
    let result = fuse(&grid, &views, true);

    for (n, p_w) in result.world_points().enumerate() {
        let expected = views
            .iter()
            .filter(|v| observe(&v.camera(), v.depth_map(), &p_w).is_some())
            .count() as u32;
        assert_eq!(result.counts()[n], expected);
    }

    // Well above every camera's field of view.
    let far = axis_aligned_grid([4, 4, 4], 0.5, Pt3::new(-1.0, 30.0, -1.0));
    for parallel in [false, true] {
        let result = fuse(&far, &views, parallel);
        assert!(result.counts().iter().all(|&c| c == 0));
        assert!(result.potentials().iter().all(|p| p.is_nan()));
        assert_eq!(result.stats().observed, 0);
    }
}

#[test]
fn potential_is_bounded_by_view_count() {
    let views = sphere_views();
    let grid = axis_aligned_grid([9, 9, 9], 0.4, Pt3::new(-1.6, -1.6, -1.6));
    let result = fuse(&grid, &views, true);
    for (n, &c) in result.counts().iter().enumerate() {
        if let Some(p) = result.potential_linear(n) {
            assert!(p.abs() <= 3.0 * c as Real + 1e-12);
        }
    }
}

#[test]
fn potential_sign_along_the_viewing_ray() {
    let k = centered_intrinsics(50.0, 40, 30);
    let sphere = Sphere {
        center: Pt3::origin(),
        radius: 1.0,
    };
    // One camera at (4, 0, 0) looking towards the origin.
    let poses = poses_orbit(1, &Pt3::origin(), 4.0, 0.0);
    let views = render_views(&k, &poses, 40, 30, &sphere, None).unwrap();
    let grid = axis_aligned_grid([9, 1, 1], 0.5, Pt3::new(-2.0, 0.0, 0.0));

    let result = FusionEngine::configure(0.5, 1.0, true)
        .unwrap()
        .run(&grid, &views)
        .unwrap();

    let values: Vec<Real> = (0..9).map(|i| result.potential(i, 0, 0).unwrap()).collect();
    // Hidden behind the surface: saturated positive.
    approx_eq(values[4], 1.0, 1e-12);
    // Between the camera and the surface: saturated negative.
    approx_eq(values[8], -1.0, 1e-12);
    // Monotone towards the camera.
    for pair in values.windows(2) {
        assert!(pair[0] >= pair[1], "{values:?}");
    }
}

#[test]
fn geometry_is_checked_before_views() {
    let basis = GridBasis::new(Vec3::x(), Vec3::new(1.0, 1.0, 0.0), Vec3::z());
    let grid = VoxelGridDescriptor::new([2, 2, 2], Vec3::repeat(1.0), Pt3::origin(), basis);
    let mut engine = FusionEngine::configure(2.0, 3.0, true).unwrap();

    match engine.run(&grid, &[]) {
        Err(FusionError::InvalidGeometry(GridError::NonOrthogonal { .. })) => {}
        other => panic!("expected InvalidGeometry, got {other:?}"),
    }
    assert_eq!(engine.last_execution_time(), 0.0);
}

#[test]
fn image_bounds_apply_to_the_projected_pixel() {
    // K = I: pixel = (x / z, y / z). Voxel centres at x = -0.3 and x = 1.7.
    let views = vec![constant_depth_view(&Mat3::identity(), &Mat4::identity(), 2, 2, 1.0)];
    let grid = axis_aligned_grid([2, 1, 1], 2.0, Pt3::new(-0.3, 0.0, 1.0));

    for parallel in [false, true] {
        let result = fuse(&grid, &views, parallel);
        // left of the image even though it rounds to column 0
        assert_eq!(result.count(0, 0, 0), 0);
        assert_eq!(result.potential(0, 0, 0), None);
        // inside [0, 2) even though it rounds to column 2
        assert_eq!(result.count(1, 0, 0), 1);
        approx_eq(result.potential(1, 0, 0).unwrap(), 0.0, 1e-12);
    }
}

#[test]
fn oversized_grid_is_invalid_geometry() {
    let k = FxFyCxCySkew::new(1.0, 1.0, 0.0, 0.0).k_matrix();
    let views = vec![constant_depth_view(&k, &Mat4::identity(), 1, 1, 5.0)];
    let grid = axis_aligned_grid([1 << 22; 3], 1.0, Pt3::origin());
    let mut engine = FusionEngine::configure(2.0, 3.0, true).unwrap();

    match engine.run(&grid, &views) {
        Err(FusionError::InvalidGeometry(GridError::TooManyVoxels { dims })) => {
            assert_eq!(dims, [1 << 22; 3]);
        }
        other => panic!("expected TooManyVoxels, got {other:?}"),
    }
}

#[test]
fn failed_run_clears_execution_time() {
    let k = FxFyCxCySkew::new(1.0, 1.0, 0.0, 0.0).k_matrix();
    let views = vec![constant_depth_view(&k, &Mat4::identity(), 1, 1, 5.0)];
    let grid = axis_aligned_grid([64, 64, 64], 0.1, Pt3::new(-3.2, -3.2, 1.0));
    let mut engine = FusionEngine::configure(2.0, 3.0, false).unwrap();

    engine.run(&grid, &views).unwrap();
    assert!(engine.last_execution_time() > 0.0);

    assert_eq!(engine.run(&grid, &[]).unwrap_err(), FusionError::NoEvidence);
    assert_eq!(engine.last_execution_time(), 0.0);
}

#[test]
fn empty_views_are_no_evidence() {
    let grid = axis_aligned_grid([2, 2, 2], 1.0, Pt3::origin());
    for parallel in [false, true] {
        let mut engine = FusionEngine::configure(2.0, 3.0, parallel).unwrap();
        assert_eq!(engine.run(&grid, &[]).unwrap_err(), FusionError::NoEvidence);
    }
}

#[test]
fn execution_time_is_recorded() {
    let views = sphere_views();
    let grid = axis_aligned_grid([8, 8, 8], 0.3, Pt3::new(-1.2, -1.2, -1.2));
    let mut engine = FusionEngine::configure(2.0, 3.0, true).unwrap();
    engine.run(&grid, &views).unwrap();
    assert!(engine.last_execution_time() >= 0.0);
    assert!(engine.last_execution_time().is_finite());
}
