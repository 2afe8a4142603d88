//! Id → manifold table owned by a triangulation.
//!
//! The registry holds shared handles (`Arc`), never copies, so one manifold
//! can serve many ids and many triangulations. Re-registering an id replaces
//! the previous association; geometry created earlier is untouched.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::manifold::{FlatManifold, Manifold};
use crate::mesh_error::MeshError;
use crate::topology::types::ManifoldId;

static FLAT: FlatManifold = FlatManifold;

/// Mapping from [`ManifoldId`] to registered manifolds.
///
/// [`ManifoldId::FLAT`] always resolves to [`FlatManifold`] without
/// registration; every other id must be registered before it is resolved.
#[derive(Clone, Debug, Default)]
pub struct ManifoldRegistry<const S: usize> {
    manifolds: BTreeMap<ManifoldId, Arc<dyn Manifold<S>>>,
}

impl<const S: usize> ManifoldRegistry<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Associate `id` with `manifold`, replacing any previous association.
    ///
    /// Returns the manifold previously registered under `id`, if any.
    pub fn set_manifold(
        &mut self,
        id: ManifoldId,
        manifold: Arc<dyn Manifold<S>>,
    ) -> Result<Option<Arc<dyn Manifold<S>>>, MeshError> {
        if id.is_flat() {
            return Err(MeshError::InvalidManifoldId(id));
        }
        let previous = self.manifolds.insert(id, manifold);
        if previous.is_some() {
            log::warn!("manifold id {id} re-registered; existing geometry is not moved");
        } else {
            log::debug!("registered manifold id {id}");
        }
        Ok(previous)
    }

    /// Resolve `id` to its manifold.
    pub fn get_manifold(&self, id: ManifoldId) -> Result<&dyn Manifold<S>, MeshError> {
        if id.is_flat() {
            return Ok(&FLAT);
        }
        self.manifolds
            .get(&id)
            .map(|m| &**m)
            .ok_or(MeshError::UnregisteredManifold(id))
    }

    /// Shared handle to the manifold registered under `id`.
    ///
    /// The flat sentinel has no registered handle and yields `None`.
    pub fn manifold_handle(&self, id: ManifoldId) -> Option<Arc<dyn Manifold<S>>> {
        self.manifolds.get(&id).cloned()
    }

    /// Remove the association of `id`, returning the manifold if one was set.
    pub fn reset_manifold(&mut self, id: ManifoldId) -> Option<Arc<dyn Manifold<S>>> {
        let removed = self.manifolds.remove(&id);
        if removed.is_some() {
            log::debug!("reset manifold id {id}");
        }
        removed
    }

    pub fn reset_all_manifolds(&mut self) {
        log::debug!("reset all {} manifolds", self.manifolds.len());
        self.manifolds.clear();
    }

    #[inline]
    pub fn contains(&self, id: ManifoldId) -> bool {
        id.is_flat() || self.manifolds.contains_key(&id)
    }

    /// Registered ids in ascending order (the flat sentinel is implicit).
    pub fn manifold_ids(&self) -> Vec<ManifoldId> {
        self.manifolds.keys().copied().collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.manifolds.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.manifolds.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::point::Point;
    use crate::manifold::SphericalManifold;

    fn sphere() -> Arc<dyn Manifold<1>> {
        Arc::new(SphericalManifold::new(Point::new([0.0]), 1.0).unwrap())
    }

    #[test]
    fn flat_resolves_without_registration() {
        let registry = ManifoldRegistry::<1>::new();
        let flat = registry.get_manifold(ManifoldId::FLAT).unwrap();
        let p = flat
            .project_to_manifold(&[Point::new([0.0]), Point::new([1.0])], &Point::origin())
            .unwrap();
        assert_eq!(p, Point::new([0.5]));
        assert!(registry.contains(ManifoldId::FLAT));
        assert!(registry.is_empty());
    }

    #[test]
    fn unregistered_id_fails() {
        let registry = ManifoldRegistry::<1>::new();
        assert_eq!(
            registry.get_manifold(ManifoldId::new(3)).unwrap_err(),
            MeshError::UnregisteredManifold(ManifoldId::new(3))
        );
    }

    #[test]
    fn flat_sentinel_cannot_be_registered() {
        let mut registry = ManifoldRegistry::<1>::new();
        assert_eq!(
            registry.set_manifold(ManifoldId::FLAT, sphere()).unwrap_err(),
            MeshError::InvalidManifoldId(ManifoldId::FLAT)
        );
    }

    #[test]
    fn last_write_wins_and_reset_removes() {
        let mut registry = ManifoldRegistry::<1>::new();
        let id = ManifoldId::new(42);
        assert!(registry.set_manifold(id, sphere()).unwrap().is_none());
        let far: Arc<dyn Manifold<1>> =
            Arc::new(SphericalManifold::new(Point::new([0.0]), 5.0).unwrap());
        assert!(registry.set_manifold(id, far).unwrap().is_some());
        let p = registry
            .get_manifold(id)
            .unwrap()
            .project_to_manifold(&[Point::new([1.0]), Point::new([2.0])], &Point::origin())
            .unwrap();
        assert_eq!(p, Point::new([5.0]));
        assert_eq!(registry.manifold_ids(), vec![id]);

        assert!(registry.reset_manifold(id).is_some());
        assert!(registry.get_manifold(id).is_err());
    }

    #[test]
    fn one_manifold_under_many_ids() {
        let mut registry = ManifoldRegistry::<1>::new();
        let shared = sphere();
        registry.set_manifold(ManifoldId::new(2), shared.clone()).unwrap();
        registry.set_manifold(ManifoldId::new(1), shared.clone()).unwrap();
        assert_eq!(Arc::strong_count(&shared), 3);
        assert_eq!(
            registry.manifold_ids(),
            vec![ManifoldId::new(1), ManifoldId::new(2)]
        );
        registry.reset_all_manifolds();
        assert_eq!(Arc::strong_count(&shared), 1);
    }
}
