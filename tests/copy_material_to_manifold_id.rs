use mesh_forest::prelude::*;

fn tagged<const DIM: usize, const S: usize>(tria: &mut Triangulation<DIM, S>) {
    tria.refine_global().unwrap();
    tria.first_active_cell_mut()
        .unwrap()
        .set_material_id(MaterialId::new(1));
}

fn manifold_ids<const DIM: usize, const S: usize>(
    tria: &Triangulation<DIM, S>,
) -> Vec<(ManifoldId, Vec<ManifoldId>)> {
    tria.active_cells()
        .map(|c| (c.manifold_id(), c.faces().map(|f| f.manifold_id()).collect()))
        .collect()
}

#[test]
fn segment_in_the_line_and_in_the_plane() {
    let mut line = hyper_cube::<1>(0.0, 1.0).unwrap();
    let mut plane = build_coarse(&[Point::new([0.0, 0.0]), Point::new([1.0, 0.0])]).unwrap();
    tagged(&mut line);
    tagged(&mut plane);

    copy_material_to_manifold_id(&mut line, false).unwrap();
    copy_material_to_manifold_id(&mut plane, false).unwrap();
    let flat = ManifoldId::FLAT;
    let expected = vec![
        (ManifoldId::new(1), vec![flat, flat]),
        (ManifoldId::new(0), vec![flat, flat]),
    ];
    assert_eq!(manifold_ids(&line), expected);
    assert_eq!(manifold_ids(&plane), expected);

    copy_material_to_manifold_id(&mut line, true).unwrap();
    copy_material_to_manifold_id(&mut plane, true).unwrap();
    let one = ManifoldId::new(1);
    let zero = ManifoldId::new(0);
    let expected = vec![(one, vec![one, zero]), (zero, vec![zero, zero])];
    assert_eq!(manifold_ids(&line), expected);
    assert_eq!(manifold_ids(&plane), expected);
}

#[test]
fn square_faces() {
    let mut tria = hyper_cube::<2>(0.0, 1.0).unwrap();
    tagged(&mut tria);
    copy_material_to_manifold_id(&mut tria, true).unwrap();
    let one = ManifoldId::new(1);
    let zero = ManifoldId::new(0);
    let ids = manifold_ids(&tria);
    // lower-left child: boundary on the left and bottom, interior elsewhere
    assert_eq!(ids[0], (one, vec![one, zero, one, zero]));
    for (cell, faces) in &ids[1..] {
        assert_eq!(*cell, zero);
        assert!(faces.iter().all(|&f| f == zero));
    }
}

#[test]
fn cube_cells_only() {
    let mut tria = hyper_cube::<3>(0.0, 1.0).unwrap();
    tagged(&mut tria);
    copy_material_to_manifold_id(&mut tria, false).unwrap();
    let cells: Vec<_> = tria.active_cells().map(|c| c.manifold_id()).collect();
    assert_eq!(cells[0], ManifoldId::new(1));
    assert!(cells[1..].iter().all(|&m| m == ManifoldId::new(0)));
    assert!(
        tria.active_cells()
            .flat_map(|c| c.faces())
            .all(|f| f.manifold_id().is_flat())
    );
}

#[test]
fn tags_survive_refinement() {
    let mut tria = hyper_cube::<2>(0.0, 1.0).unwrap();
    tagged(&mut tria);
    tria.refine_global().unwrap();
    let materials: Vec<_> = tria.active_cells().map(|c| c.material_id().get()).collect();
    assert_eq!(materials.iter().filter(|&&m| m == 1).count(), 4);
    assert_eq!(&materials[..4], &[1, 1, 1, 1]);
}
