use std::time::Duration;

use log::{debug, info};
use winit::keyboard::KeyCode;

use crate::{
    config::AppConfig,
    renderer::camera::PositionController,
    transform::{random::IndexSource, AppliedOps, TransformStore},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreRequest {
    Select,
    Scale,
    Recenter,
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Store(StoreRequest),
    ApplyTexture(usize),
    Move(Movement),
    Close,
    ToggleOverlay,
    ToggleFullscreen,
}

impl KeyAction {
    /// Movement keys act while held; everything else fires once per press.
    pub fn is_held(&self) -> bool {
        matches!(self, KeyAction::Move(_))
    }
}

pub fn action_for_key(code: KeyCode) -> Option<KeyAction> {
    let action = match code {
        KeyCode::KeyR => KeyAction::Store(StoreRequest::Select),
        KeyCode::KeyE => KeyAction::Store(StoreRequest::Scale),
        KeyCode::KeyC => KeyAction::Store(StoreRequest::Recenter),
        KeyCode::KeyQ => KeyAction::Store(StoreRequest::Reset),
        KeyCode::KeyY => KeyAction::ApplyTexture(0),
        KeyCode::KeyT => KeyAction::ApplyTexture(1),
        KeyCode::KeyW => KeyAction::Move(Movement::Forward),
        KeyCode::KeyS => KeyAction::Move(Movement::Backward),
        KeyCode::KeyA => KeyAction::Move(Movement::Left),
        KeyCode::KeyD => KeyAction::Move(Movement::Right),
        KeyCode::Space => KeyAction::Move(Movement::Up),
        KeyCode::ShiftLeft => KeyAction::Move(Movement::Down),
        KeyCode::Escape | KeyCode::KeyM => KeyAction::Close,
        KeyCode::F10 => KeyAction::ToggleOverlay,
        KeyCode::F11 => KeyAction::ToggleFullscreen,
        _ => return None,
    };
    Some(action)
}

pub fn apply_movement(controller: &mut PositionController, movement: Movement, pressed: bool) {
    match movement {
        Movement::Forward => controller.forward = pressed,
        Movement::Backward => controller.backward = pressed,
        Movement::Left => controller.left = pressed,
        Movement::Right => controller.right = pressed,
        Movement::Up => controller.up = pressed,
        Movement::Down => controller.down = pressed,
    }
}

/// Collects the discrete requests of a frame and feeds them to the
/// [`TransformStore`] in arrival order.
#[derive(Debug, Default)]
pub struct SceneController {
    queued: Vec<StoreRequest>,
    since_rotation: Duration,
    applied_texture: usize,
}

impl SceneController {
    pub fn queue(&mut self, request: StoreRequest) {
        self.queued.push(request);
    }

    #[cfg(test)]
    pub fn queued(&self) -> &[StoreRequest] {
        &self.queued
    }

    pub fn applied_texture(&self) -> usize {
        self.applied_texture
    }

    pub fn set_applied_texture(&mut self, texture: usize) {
        if texture == self.applied_texture {
            return;
        }
        if texture == 0 {
            info!("Resetting all textures");
        } else {
            info!("Setting new texture");
        }
        self.applied_texture = texture;
    }

    fn rotation_due(&mut self, elapsed: Duration, interval: Duration) -> bool {
        if interval.is_zero() {
            return true;
        }
        self.since_rotation += elapsed;
        if self.since_rotation >= interval {
            self.since_rotation = Duration::ZERO;
            true
        } else {
            false
        }
    }

    /// One frame worth of store updates: queued requests first, then the
    /// pending operations of the selected object.
    pub fn apply<S: IndexSource + ?Sized>(
        &mut self,
        store: &mut TransformStore,
        source: &mut S,
        config: &AppConfig,
        elapsed: Duration,
    ) -> AppliedOps {
        for request in self.queued.drain(..) {
            match request {
                StoreRequest::Select => {
                    store.select_random(&mut *source);
                    // Rotation fires in this same call, then every interval.
                    self.since_rotation = config.rotation_interval;
                }
                StoreRequest::Scale => store.request_scale(),
                StoreRequest::Recenter => store.request_recenter(),
                StoreRequest::Reset => store.reset_all(),
            }
        }

        let rotate = store.selection().rotation_active
            && self.rotation_due(elapsed, config.rotation_interval);
        let ops = store.apply_pending(rotate, config.target_scale);
        if ops.any() {
            debug!(
                "Applied {:?} to object #{:?}",
                ops,
                store.selected_index()
            );
        }
        ops
    }
}

#[cfg(test)]
mod test {
    use std::time::Duration;

    use glam::Mat4;
    use winit::keyboard::KeyCode;

    use super::{
        action_for_key, apply_movement, KeyAction, Movement, SceneController, StoreRequest,
    };
    use crate::{
        config::AppConfig,
        renderer::camera::PositionController,
        transform::{random::SequenceIndexSource, TransformStore},
    };

    const FRAME: Duration = Duration::from_millis(16);

    fn every_frame() -> AppConfig {
        AppConfig {
            rotation_interval: Duration::ZERO,
            ..AppConfig::default()
        }
    }

    #[test]
    fn test_key_bindings() {
        assert_eq!(
            action_for_key(KeyCode::KeyR),
            Some(KeyAction::Store(StoreRequest::Select))
        );
        assert_eq!(
            action_for_key(KeyCode::KeyQ),
            Some(KeyAction::Store(StoreRequest::Reset))
        );
        assert_eq!(action_for_key(KeyCode::KeyT), Some(KeyAction::ApplyTexture(1)));
        assert_eq!(action_for_key(KeyCode::KeyM), Some(KeyAction::Close));
        assert_eq!(action_for_key(KeyCode::KeyZ), None);
        assert!(action_for_key(KeyCode::KeyW).unwrap().is_held());
        assert!(!action_for_key(KeyCode::KeyE).unwrap().is_held());
    }

    #[test]
    fn test_movement_flags_follow_key_state() {
        let mut controller = PositionController::default();
        apply_movement(&mut controller, Movement::Left, true);
        assert!(controller.left);
        apply_movement(&mut controller, Movement::Left, false);
        assert!(!controller.left);
    }

    #[test]
    fn test_select_and_rotate_full_turn() {
        let config = every_frame();
        let mut store = TransformStore::default();
        let mut source = SequenceIndexSource::new([2]);
        let mut controller = SceneController::default();

        controller.queue(StoreRequest::Select);
        for _ in 0..8 {
            let ops = controller.apply(&mut store, &mut source, &config, FRAME);
            assert!(ops.rotated);
        }
        assert!(controller.queued().is_empty());
        assert!(store
            .current_transform(2)
            .unwrap()
            .abs_diff_eq(Mat4::IDENTITY, 1e-4));
        for index in [0, 1, 3] {
            assert_eq!(*store.current_transform(index).unwrap(), Mat4::IDENTITY);
        }
    }

    #[test]
    fn test_rotation_is_paced() {
        let config = AppConfig {
            rotation_interval: Duration::from_millis(40),
            ..AppConfig::default()
        };
        let mut store = TransformStore::default();
        let mut source = SequenceIndexSource::new([0]);
        let mut controller = SceneController::default();

        controller.queue(StoreRequest::Select);
        let rotated: Vec<bool> = (0..6)
            .map(|_| {
                controller
                    .apply(&mut store, &mut source, &config, Duration::from_millis(20))
                    .rotated
            })
            .collect();
        assert_eq!(rotated, vec![true, false, true, false, true, false]);
        assert_eq!(store.selection().accumulated_angle, 135.0);
    }

    #[test]
    fn test_requests_apply_in_order() {
        let config = every_frame();
        let mut store = TransformStore::default();
        let mut source = SequenceIndexSource::new([1]);
        let mut controller = SceneController::default();

        controller.queue(StoreRequest::Select);
        controller.queue(StoreRequest::Reset);
        let ops = controller.apply(&mut store, &mut source, &config, FRAME);
        assert!(!ops.any());
        assert_eq!(store.selected_index(), None);

        controller.queue(StoreRequest::Select);
        controller.queue(StoreRequest::Recenter);
        let ops = controller.apply(&mut store, &mut source, &config, FRAME);
        assert!(ops.rotated);
        assert!(ops.recentered);
        assert!(store.objects()[1].world_center().length() < 0.01);
    }

    #[test]
    fn test_scale_request_without_selection_waits() {
        let config = every_frame();
        let mut store = TransformStore::default();
        let mut source = SequenceIndexSource::new([3]);
        let mut controller = SceneController::default();

        controller.queue(StoreRequest::Scale);
        assert!(!controller.apply(&mut store, &mut source, &config, FRAME).any());
        assert!(store.selection().scale_pending);

        controller.queue(StoreRequest::Select);
        let ops = controller.apply(&mut store, &mut source, &config, FRAME);
        assert!(ops.scaled);
        assert!(!store.selection().scale_pending);
    }

    #[test]
    fn test_texture_switch() {
        let mut controller = SceneController::default();
        assert_eq!(controller.applied_texture(), 0);
        controller.set_applied_texture(1);
        assert_eq!(controller.applied_texture(), 1);
        controller.set_applied_texture(0);
        assert_eq!(controller.applied_texture(), 0);
    }
}
