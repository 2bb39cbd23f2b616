use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

use wgpu::{CreateSurfaceError, RequestDeviceError};
use winit::error::{EventLoopError, OsError};

/// Startup failures. None of them are retried: the process reports the
/// message and exits.
#[derive(Debug)]
pub enum AppError {
    EventLoop(EventLoopError),
    Window(OsError),
    Surface(CreateSurfaceError),
    NoAdapter,
    Device(RequestDeviceError),
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AppError::EventLoop(err) => write!(f, "Failed to run event loop: {}", err),
            AppError::Window(err) => write!(f, "Failed to create window: {}", err),
            AppError::Surface(err) => write!(f, "Failed to create surface: {}", err),
            AppError::NoAdapter => write!(f, "Failed to acquire a graphic adapter"),
            AppError::Device(err) => write!(f, "Failed to acquire a device: {}", err),
        }
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AppError::EventLoop(err) => Some(err),
            AppError::Window(err) => Some(err),
            AppError::Surface(err) => Some(err),
            AppError::NoAdapter => None,
            AppError::Device(err) => Some(err),
        }
    }
}

impl From<EventLoopError> for AppError {
    fn from(value: EventLoopError) -> Self {
        AppError::EventLoop(value)
    }
}

impl From<OsError> for AppError {
    fn from(value: OsError) -> Self {
        AppError::Window(value)
    }
}

impl From<CreateSurfaceError> for AppError {
    fn from(value: CreateSurfaceError) -> Self {
        AppError::Surface(value)
    }
}

impl From<RequestDeviceError> for AppError {
    fn from(value: RequestDeviceError) -> Self {
        AppError::Device(value)
    }
}
