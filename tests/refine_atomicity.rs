use std::sync::Arc;

use mesh_forest::prelude::*;

fn three_segments() -> Triangulation<1, 1> {
    build_coarse(&[
        Point::new([0.0]),
        Point::new([1.0]),
        Point::new([2.0]),
        Point::new([3.0]),
    ])
    .unwrap()
}

fn snapshot(tria: &Triangulation<1, 1>) -> (usize, usize, usize, Vec<Point<1>>) {
    (
        tria.n_cells(),
        tria.n_faces(),
        tria.n_active_cells(),
        tria.vertices().iter().map(|v| v.point()).collect(),
    )
}

#[test]
fn unregistered_id_leaves_the_mesh_untouched() {
    let mut tria = three_segments();
    let before = snapshot(&tria);
    // only the last cell carries the missing id, so earlier cells would
    // already be planned when the lookup fails
    tria.cell_mut(CellId::new(2))
        .unwrap()
        .set_manifold_id(ManifoldId::new(5));
    assert_eq!(
        tria.refine_global().unwrap_err(),
        MeshError::UnregisteredManifold(ManifoldId::new(5))
    );
    assert_eq!(snapshot(&tria), before);
    assert!(tria.validate_invariants().is_ok());
}

#[test]
fn degenerate_projection_leaves_the_mesh_untouched() {
    let mut tria = three_segments();
    // the midpoint of [1, 2] is the sphere center
    tria.set_manifold(
        ManifoldId::new(1),
        Arc::new(SphericalManifold::new(Point::new([1.5]), 1.0).unwrap()),
    )
    .unwrap();
    tria.cell_mut(CellId::new(1))
        .unwrap()
        .set_manifold_id(ManifoldId::new(1));
    let before = snapshot(&tria);
    assert!(matches!(
        tria.refine_global(),
        Err(MeshError::DegenerateProjection(_))
    ));
    assert_eq!(snapshot(&tria), before);

    // recovering: point the id at a usable manifold and retry
    tria.set_manifold(
        ManifoldId::new(1),
        Arc::new(SphericalManifold::new(Point::new([0.0]), 1.6).unwrap()),
    )
    .unwrap();
    tria.refine_global().unwrap();
    assert_eq!(tria.n_active_cells(), 6);
    let mid = tria.cell(CellId::new(1)).unwrap().child(0).unwrap().vertex(1).unwrap();
    assert!((mid[0] - 1.6).abs() < 1e-12);
}

#[derive(Debug)]
struct Runaway;

impl Manifold<1> for Runaway {
    fn project_to_manifold(
        &self,
        _surrounding_points: &[Point<1>],
        _candidate: &Point<1>,
    ) -> Result<Point<1>, MeshError> {
        Ok(Point::new([f64::INFINITY]))
    }
}

#[test]
fn non_finite_projection_is_rejected() {
    let mut tria = three_segments();
    tria.set_manifold(ManifoldId::new(9), Arc::new(Runaway)).unwrap();
    tria.cell_mut(CellId::new(0))
        .unwrap()
        .set_manifold_id(ManifoldId::new(9));
    let before = snapshot(&tria);
    assert!(matches!(
        tria.refine_global(),
        Err(MeshError::DegenerateProjection(_))
    ));
    assert_eq!(snapshot(&tria), before);
}

#[test]
fn geometry_check_rejects_folded_children() {
    let mut tria = three_segments();
    tria.set_options(RefineOptions {
        check_geometry: true,
        ..RefineOptions::default()
    });
    // pushes the midpoint of [0, 1] past its right end
    tria.set_manifold(
        ManifoldId::new(2),
        Arc::new(SphericalManifold::new(Point::new([-1.0]), 3.0).unwrap()),
    )
    .unwrap();
    tria.cell_mut(CellId::new(0))
        .unwrap()
        .set_manifold_id(ManifoldId::new(2));
    let before = snapshot(&tria);
    assert!(matches!(
        tria.refine_global(),
        Err(MeshError::InvalidGeometry(_))
    ));
    assert_eq!(snapshot(&tria), before);
}

#[test]
fn failed_pass_keeps_earlier_passes() {
    let mut tria = three_segments();
    tria.refine_global().unwrap();
    let id = tria.active_cell_ids().last().unwrap();
    tria.cell_mut(id).unwrap().set_manifold_id(ManifoldId::new(77));
    assert!(tria.refine_global_times(2).is_err());
    assert_eq!(tria.n_active_cells(), 6);
    assert_eq!(tria.n_levels(), 2);
}
