use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

use glam::{Mat4, Vec3};
use log::{debug, info, warn};

use crate::scene::OBJECT_CENTERS;

pub mod random;

use random::IndexSource;

pub const OBJECT_COUNT: usize = 4;
pub const ROTATION_STEP_DEGREES: f32 = 45.0;
pub const CONVERGENCE_EPSILON: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformError {
    IndexOutOfRange { index: usize, count: usize },
}

impl Display for TransformError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            TransformError::IndexOutOfRange { index, count } => {
                write!(f, "object index {} out of range (0..{})", index, count)
            }
        }
    }
}

impl Error for TransformError {}

/// Wraps `op` so that it acts around `pivot` instead of the origin.
fn about_pivot(pivot: Vec3, op: Mat4) -> Mat4 {
    Mat4::from_translation(pivot) * op * Mat4::from_translation(-pivot)
}

fn axis_scale(matrix: &Mat4) -> Vec3 {
    Vec3::new(
        matrix.x_axis.truncate().length(),
        matrix.y_axis.truncate().length(),
        matrix.z_axis.truncate().length(),
    )
}

#[derive(Debug, Clone)]
pub struct Object {
    id: usize,
    center: Vec3,
    transform: Mat4,
}

impl Object {
    fn new(id: usize, center: Vec3) -> Self {
        Self {
            id,
            center,
            transform: Mat4::IDENTITY,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn transform(&self) -> &Mat4 {
        &self.transform
    }

    /// Where the pivot currently sits in world space.
    pub fn world_center(&self) -> Vec3 {
        self.transform.transform_point3(self.center)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    pub selected_index: Option<usize>,
    pub rotation_active: bool,
    pub scale_pending: bool,
    pub recenter_pending: bool,
    /// Total rotation applied since the last reset, wrapped to `[0, 360)`.
    pub accumulated_angle: f32,
}

/// Which operations actually changed a matrix during [`TransformStore::apply_pending`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AppliedOps {
    pub rotated: bool,
    pub scaled: bool,
    pub recentered: bool,
}

impl AppliedOps {
    pub fn any(&self) -> bool {
        self.rotated || self.scaled || self.recentered
    }
}

/// Per-object transform matrices plus the single-target selection that
/// decides which of them the next operation touches.
///
/// Every mutating operation only ever writes the matrix of the selected
/// object. Pivot-relative operations are left-multiplied onto the existing
/// matrix so that successive operations compound.
#[derive(Debug, Clone)]
pub struct TransformStore {
    objects: [Object; OBJECT_COUNT],
    selection: Selection,
}

impl Default for TransformStore {
    fn default() -> Self {
        Self::new(OBJECT_CENTERS)
    }
}

impl TransformStore {
    pub fn new(centers: [Vec3; OBJECT_COUNT]) -> Self {
        let mut id = 0;
        let objects = centers.map(|center| {
            let object = Object::new(id, center);
            id += 1;
            object
        });
        Self {
            objects,
            selection: Selection::default(),
        }
    }

    pub fn objects(&self) -> &[Object; OBJECT_COUNT] {
        &self.objects
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selection.selected_index
    }

    pub fn current_transform(&self, index: usize) -> Option<&Mat4> {
        self.objects.get(index).map(|object| &object.transform)
    }

    pub fn transforms(&self) -> impl Iterator<Item = (usize, &Mat4)> + '_ {
        self.objects
            .iter()
            .map(|object| (object.id, &object.transform))
    }

    fn is_selected(&self, index: usize) -> bool {
        self.selection.selected_index == Some(index)
    }

    pub fn select(&mut self, index: usize) -> Result<(), TransformError> {
        if index >= OBJECT_COUNT {
            return Err(TransformError::IndexOutOfRange {
                index,
                count: OBJECT_COUNT,
            });
        }
        self.selection.selected_index = Some(index);
        self.selection.rotation_active = true;
        info!("Selected object #{}", index);
        Ok(())
    }

    pub fn select_random<S: IndexSource + ?Sized>(&mut self, source: &mut S) -> usize {
        let index = source.next_index(OBJECT_COUNT).min(OBJECT_COUNT - 1);
        self.selection.selected_index = Some(index);
        self.selection.rotation_active = true;
        info!("Selected object #{}", index);
        index
    }

    pub fn request_scale(&mut self) {
        self.selection.scale_pending = true;
    }

    pub fn request_recenter(&mut self) {
        self.selection.recenter_pending = true;
    }

    /// Rotates the selected object one step around its pivot on the z axis.
    ///
    /// Returns `false` without touching anything unless `index` is selected
    /// and rotation is active.
    pub fn rotate_step(&mut self, index: usize) -> bool {
        if !self.is_selected(index) || !self.selection.rotation_active {
            return false;
        }
        self.selection.accumulated_angle =
            (self.selection.accumulated_angle + ROTATION_STEP_DEGREES).rem_euclid(360.0);

        let object = &mut self.objects[index];
        let rotation = Mat4::from_rotation_z(ROTATION_STEP_DEGREES.to_radians());
        object.transform = about_pivot(object.center, rotation) * object.transform;
        true
    }

    /// Scales the selected object around its pivot until its per-axis scale
    /// matches `target_scale`.
    ///
    /// The pending request is consumed even when the scale is already within
    /// [`CONVERGENCE_EPSILON`] of the target.
    ///
    /// Repeating the call is a no-op only when `target_scale.x == target_scale.y`.
    /// The scale is applied in world axes, so after a rotation about z a
    /// non-uniform xy target bleeds into both columns and never settles.
    pub fn scale_to(&mut self, index: usize, target_scale: Vec3) -> bool {
        if !self.is_selected(index) || !self.selection.scale_pending {
            return false;
        }
        self.selection.scale_pending = false;

        let object = &mut self.objects[index];
        let current_scale = axis_scale(&object.transform);
        if current_scale.distance(target_scale) <= CONVERGENCE_EPSILON {
            debug!("Object #{} already at scale {}", index, target_scale);
            return false;
        }
        if current_scale.min_element() <= f32::EPSILON {
            warn!(
                "Object #{} has a collapsed axis ({}), skip scaling",
                index, current_scale
            );
            return false;
        }
        let factor = target_scale / current_scale;
        object.transform = about_pivot(object.center, Mat4::from_scale(factor)) * object.transform;
        true
    }

    /// Translates the selected object so that its pivot lands on the origin.
    ///
    /// Consumes the pending request whether or not a translation was needed.
    pub fn recenter(&mut self, index: usize) -> bool {
        if !self.is_selected(index) || !self.selection.recenter_pending {
            return false;
        }
        self.selection.recenter_pending = false;

        let object = &mut self.objects[index];
        let offset = -object.world_center();
        if offset.length() <= CONVERGENCE_EPSILON {
            debug!("Object #{} already centered", index);
            return false;
        }
        object.transform = Mat4::from_translation(offset) * object.transform;
        true
    }

    pub fn reset_all(&mut self) {
        self.selection = Selection::default();
        for object in &mut self.objects {
            object.transform = Mat4::IDENTITY;
        }
        info!("Reset all transforms");
    }

    /// Runs the pending operations for the selected object, rotation first.
    ///
    /// `rotate` gates the rotation step so that callers can pace it.
    pub fn apply_pending(&mut self, rotate: bool, target_scale: Vec3) -> AppliedOps {
        let Some(index) = self.selection.selected_index else {
            return AppliedOps::default();
        };
        AppliedOps {
            rotated: rotate && self.rotate_step(index),
            scaled: self.scale_to(index, target_scale),
            recentered: self.recenter(index),
        }
    }
}

#[cfg(test)]
mod test {
    use glam::{Mat4, Vec3};

    use super::{
        random::SequenceIndexSource, TransformError, TransformStore, CONVERGENCE_EPSILON,
        OBJECT_COUNT,
    };

    const TOLERANCE: f32 = 1e-4;
    const TARGET_SCALE: Vec3 = Vec3::new(1.5, 1.5, 1.0);

    fn snapshot(store: &TransformStore) -> Vec<Mat4> {
        store.transforms().map(|(_, matrix)| *matrix).collect()
    }

    fn assert_others_untouched(before: &[Mat4], after: &[Mat4], selected: usize) {
        for index in (0..OBJECT_COUNT).filter(|index| *index != selected) {
            assert_eq!(before[index], after[index], "object #{} changed", index);
        }
    }

    #[test]
    fn test_new_store_is_identity() {
        let store = TransformStore::default();
        for (_, matrix) in store.transforms() {
            assert_eq!(*matrix, Mat4::IDENTITY);
        }
        assert_eq!(store.selected_index(), None);
        assert!(!store.selection().rotation_active);
    }

    #[test]
    fn test_reset_all_restores_identity() {
        let mut store = TransformStore::default();
        store.select(1).unwrap();
        store.request_scale();
        store.request_recenter();
        store.apply_pending(true, TARGET_SCALE);
        assert_ne!(*store.current_transform(1).unwrap(), Mat4::IDENTITY);

        store.reset_all();
        for index in 0..OBJECT_COUNT {
            assert_eq!(*store.current_transform(index).unwrap(), Mat4::IDENTITY);
        }
        let selection = store.selection();
        assert_eq!(selection.selected_index, None);
        assert!(!selection.rotation_active);
        assert!(!selection.scale_pending);
        assert!(!selection.recenter_pending);
        assert_eq!(selection.accumulated_angle, 0.0);
    }

    #[test]
    fn test_rotation_closes_after_full_turn() {
        let mut store = TransformStore::default();
        store.select(0).unwrap();
        let before = *store.current_transform(0).unwrap();
        for _ in 0..8 {
            assert!(store.rotate_step(0));
        }
        let after = *store.current_transform(0).unwrap();
        assert!(after.abs_diff_eq(before, TOLERANCE), "{:?}", after);
        assert!(store.selection().accumulated_angle.abs() < TOLERANCE);
    }

    #[test]
    fn test_rotation_keeps_pivot_in_place() {
        let mut store = TransformStore::default();
        store.select(3).unwrap();
        let center = store.objects()[3].center();
        for _ in 0..3 {
            store.rotate_step(3);
            let pivot = store.objects()[3].world_center();
            assert!(pivot.abs_diff_eq(center, TOLERANCE), "{}", pivot);
        }
        assert_eq!(store.selection().accumulated_angle, 135.0);
    }

    #[test]
    fn test_rotation_compounds_onto_existing_matrix() {
        let mut store = TransformStore::default();
        store.select(1).unwrap();
        store.request_recenter();
        store.recenter(1);
        let recentered = *store.current_transform(1).unwrap();

        for _ in 0..8 {
            store.rotate_step(1);
        }
        assert!(store
            .current_transform(1)
            .unwrap()
            .abs_diff_eq(recentered, TOLERANCE));
    }

    #[test]
    fn test_rotation_requires_selection_and_activity() {
        let mut store = TransformStore::default();
        assert!(!store.rotate_step(0));
        assert_eq!(*store.current_transform(0).unwrap(), Mat4::IDENTITY);

        store.select(2).unwrap();
        assert!(!store.rotate_step(0));
        assert_eq!(*store.current_transform(0).unwrap(), Mat4::IDENTITY);
        assert_eq!(store.selection().accumulated_angle, 0.0);
    }

    #[test]
    fn test_scale_after_rotation_is_idempotent() {
        let mut store = TransformStore::default();
        store.select(0).unwrap();
        store.rotate_step(0);

        store.request_scale();
        assert!(store.scale_to(0, TARGET_SCALE));
        let scaled = *store.current_transform(0).unwrap();
        assert!(super::axis_scale(&scaled).abs_diff_eq(TARGET_SCALE, TOLERANCE));

        store.request_scale();
        assert!(!store.scale_to(0, TARGET_SCALE));
        assert_eq!(*store.current_transform(0).unwrap(), scaled);
    }

    #[test]
    fn test_scale_converges_then_is_idempotent() {
        let mut store = TransformStore::default();
        store.select(0).unwrap();
        store.request_scale();
        assert!(store.scale_to(0, TARGET_SCALE));
        assert!(!store.selection().scale_pending);
        let scaled = *store.current_transform(0).unwrap();
        assert!(super::axis_scale(&scaled).abs_diff_eq(TARGET_SCALE, TOLERANCE));

        store.request_scale();
        assert!(!store.scale_to(0, TARGET_SCALE));
        assert_eq!(*store.current_transform(0).unwrap(), scaled);
        assert!(!store.selection().scale_pending);
    }

    #[test]
    fn test_scale_keeps_pivot_in_place() {
        let mut store = TransformStore::default();
        store.select(2).unwrap();
        store.request_scale();
        store.scale_to(2, Vec3::new(0.5, 2.0, 1.0));
        let object = &store.objects()[2];
        assert!(object
            .world_center()
            .abs_diff_eq(object.center(), TOLERANCE));
    }

    #[test]
    fn test_scale_consumes_request_when_already_converged() {
        let mut store = TransformStore::default();
        store.select(1).unwrap();
        store.request_scale();
        assert!(!store.scale_to(1, Vec3::ONE));
        assert!(!store.selection().scale_pending);
        assert_eq!(*store.current_transform(1).unwrap(), Mat4::IDENTITY);
    }

    #[test]
    fn test_scale_without_request_is_noop() {
        let mut store = TransformStore::default();
        store.select(1).unwrap();
        assert!(!store.scale_to(1, TARGET_SCALE));
        assert_eq!(*store.current_transform(1).unwrap(), Mat4::IDENTITY);
    }

    #[test]
    fn test_recenter_moves_pivot_to_origin() {
        let mut store = TransformStore::default();
        store.select(2).unwrap();
        store.request_recenter();
        assert!(store.recenter(2));
        assert!(store.objects()[2].world_center().length() < CONVERGENCE_EPSILON);
        assert!(!store.selection().recenter_pending);

        let centered = *store.current_transform(2).unwrap();
        store.request_recenter();
        assert!(!store.recenter(2));
        assert_eq!(*store.current_transform(2).unwrap(), centered);
        assert!(!store.selection().recenter_pending);
    }

    #[test]
    fn test_recenter_after_rotation_and_scale() {
        let mut store = TransformStore::default();
        store.select(3).unwrap();
        store.rotate_step(3);
        store.request_scale();
        store.scale_to(3, TARGET_SCALE);
        store.request_recenter();
        store.recenter(3);
        assert!(store.objects()[3].world_center().length() < CONVERGENCE_EPSILON);
    }

    #[test]
    fn test_unselected_objects_are_bit_identical() {
        let mut store = TransformStore::default();
        store.select(1).unwrap();
        store.rotate_step(1);
        store.reset_all();
        store.select(0).unwrap();
        store.rotate_step(0);
        store.select(1).unwrap();

        let before = snapshot(&store);
        store.rotate_step(1);
        store.request_scale();
        store.scale_to(1, TARGET_SCALE);
        store.request_recenter();
        store.recenter(1);
        let after = snapshot(&store);

        assert_others_untouched(&before, &after, 1);
        assert_ne!(before[1], after[1]);
    }

    #[test]
    fn test_pending_flags_ignore_other_indices() {
        let mut store = TransformStore::default();
        store.select(0).unwrap();
        store.request_scale();
        store.request_recenter();
        assert!(!store.scale_to(3, TARGET_SCALE));
        assert!(!store.recenter(3));
        assert_eq!(*store.current_transform(3).unwrap(), Mat4::IDENTITY);
        assert!(store.selection().scale_pending);
        assert!(store.selection().recenter_pending);
    }

    #[test]
    fn test_select_rejects_out_of_range() {
        let mut store = TransformStore::default();
        assert_eq!(
            store.select(OBJECT_COUNT),
            Err(TransformError::IndexOutOfRange {
                index: OBJECT_COUNT,
                count: OBJECT_COUNT
            })
        );
        assert_eq!(store.selected_index(), None);
        assert!(store.current_transform(OBJECT_COUNT).is_none());
    }

    #[test]
    fn test_apply_pending_without_selection() {
        let mut store = TransformStore::default();
        store.request_scale();
        store.request_recenter();
        assert!(!store.apply_pending(true, TARGET_SCALE).any());
        assert!(store.selection().scale_pending);
        assert!(store.selection().recenter_pending);
    }

    #[test]
    fn test_apply_pending_respects_rotation_gate() {
        let mut store = TransformStore::default();
        store.select(2).unwrap();
        let ops = store.apply_pending(false, TARGET_SCALE);
        assert!(!ops.any());
        assert_eq!(*store.current_transform(2).unwrap(), Mat4::IDENTITY);

        let ops = store.apply_pending(true, TARGET_SCALE);
        assert!(ops.rotated);
        assert!(!ops.scaled);
        assert!(!ops.recentered);
    }

    #[test]
    fn test_select_random_then_full_turn() {
        let mut store = TransformStore::default();
        let mut source = SequenceIndexSource::new([2]);
        assert_eq!(store.select_random(&mut source), 2);
        assert!(store.selection().rotation_active);

        for _ in 0..8 {
            store.rotate_step(2);
        }
        assert!(store
            .current_transform(2)
            .unwrap()
            .abs_diff_eq(Mat4::IDENTITY, TOLERANCE));
        for index in [0, 1, 3] {
            assert_eq!(*store.current_transform(index).unwrap(), Mat4::IDENTITY);
        }
    }
}
