//! End-to-end tests: text file to cross-checked bounding box.

#![allow(clippy::unwrap_used, clippy::float_cmp)]

use std::io::Write;

use mesh_audit::{
    AabbPolicy, AuditConfig, AuditError, BvhOracle, compute_aabb, cross_check, is_valid_mesh,
    validate_mesh,
};
use mesh_bvh::BvhParams;
use mesh_io::{load_mesh, parse_mesh_str, try_load_mesh};
use mesh_types::Point3;
use tempfile::NamedTempFile;

const SQUARE: &str = "\
Mesh Triangles
(0.0, 0.0, 0.0)
(1.0, 0.0, 0.0)
(1.0, 1.0, 0.0)
(0.0, 1.0, 0.0)
Indices:
0,1,2,
0,2,3
";

fn write_temp(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn square_from_file_matches_oracle() {
    let file = write_temp(SQUARE);
    let loaded = try_load_mesh(file.path()).unwrap();
    assert!(loaded.is_clean());
    assert!(is_valid_mesh(&loaded.mesh));

    let config = AuditConfig::default();
    let check = cross_check(&loaded.mesh, &BvhOracle::new(config.bvh), &config).unwrap();
    assert!(check.is_match());
    assert_eq!(check.comparison.local.min, Point3::new(0.0, 0.0, 0.0));
    assert_eq!(check.comparison.local.max, Point3::new(1.0, 1.0, 0.0));
}

#[test]
fn stray_vertex_is_ignored_by_default_policy() {
    let text = "\
Mesh Triangles
(0, 0, 0)
(2, 0, 0)
(0, 3, 0)
(100, 100, 100)
Indices:
0, 1, 2
";
    let loaded = parse_mesh_str(text).unwrap();
    let report = validate_mesh(&loaded.mesh);
    assert_eq!(report.unreferenced_vertex_count, 1);

    let referenced = compute_aabb(&loaded.mesh, AabbPolicy::ReferencedOnly).unwrap();
    assert_eq!(referenced.max, Point3::new(2.0, 3.0, 0.0));

    let all = compute_aabb(&loaded.mesh, AabbPolicy::AllVertices).unwrap();
    assert_eq!(all.max, Point3::new(100.0, 100.0, 100.0));

    let config = AuditConfig::default();
    assert!(
        cross_check(&loaded.mesh, &BvhOracle::new(config.bvh), &config)
            .unwrap()
            .is_match()
    );
}

#[test]
fn out_of_range_index_is_invalid_topology() {
    let text = "\
Mesh Triangles
(0, 0, 0)
(1, 0, 0)
(0, 1, 0)
Indices:
0,1,3
";
    let loaded = parse_mesh_str(text).unwrap();
    assert!(!is_valid_mesh(&loaded.mesh));

    let config = AuditConfig::default();
    let err = cross_check(&loaded.mesh, &BvhOracle::new(config.bvh), &config).unwrap_err();
    assert_eq!(
        err,
        AuditError::InvalidMeshTopology {
            position: 2,
            index: 3,
            vertex_count: 3,
        }
    );
}

#[test]
fn infinite_coordinates_match_oracle() {
    let text = "\
Mesh Triangles
(inf, 0, 0)
(inf, 1, 0)
(inf, 0, 1)
Indices:
0,1,2
";
    let loaded = parse_mesh_str(text).unwrap();
    let config = AuditConfig::default();
    let check = cross_check(&loaded.mesh, &BvhOracle::new(config.bvh), &config).unwrap();
    assert!(check.is_match());
    assert_eq!(check.comparison.local.min, Point3::new(f64::INFINITY, 0.0, 0.0));
    assert_eq!(check.comparison.local.max, Point3::new(f64::INFINITY, 1.0, 1.0));
    assert_eq!(check.comparison.max_deviation, 0.0);
}

#[test]
fn missing_file_yields_empty_mesh() {
    let dir = tempfile::tempdir().unwrap();
    let loaded = load_mesh(dir.path().join("absent.txt")).unwrap();
    assert!(loaded.mesh.is_empty());

    let config = AuditConfig::default();
    let err = cross_check(&loaded.mesh, &BvhOracle::new(config.bvh), &config).unwrap_err();
    assert_eq!(err, AuditError::EmptyMesh);
}

#[test]
fn parallel_oracle_agrees_on_grid() {
    // 20x20 grid of quads in the z = 0 plane, lifted at one corner.
    let n = 21_u32;
    let mut text = String::from("Mesh Triangles\n");
    for j in 0..n {
        for i in 0..n {
            let z = if i == n - 1 && j == n - 1 { 0.5 } else { 0.0 };
            text.push_str(&format!("({}, {}, {z})\n", f64::from(i) * 0.1, f64::from(j) * 0.1));
        }
    }
    text.push_str("Indices:\n");
    for j in 0..n - 1 {
        for i in 0..n - 1 {
            let a = j * n + i;
            text.push_str(&format!("{}, {}, {},\n", a, a + 1, a + n + 1));
            text.push_str(&format!("{}, {}, {},\n", a, a + n + 1, a + n));
        }
    }

    let loaded = parse_mesh_str(&text).unwrap();
    assert_eq!(loaded.mesh.triangle_count(), 800);

    let params = BvhParams::default()
        .with_parallel(true)
        .with_parallel_threshold(16)
        .with_max_leaf_size(2);
    let config = AuditConfig::default().with_bvh_params(params);
    let check = cross_check(&loaded.mesh, &BvhOracle::new(config.bvh), &config).unwrap();
    assert!(check.is_match());
    assert_eq!(check.comparison.local.max.z, 0.5);
}
