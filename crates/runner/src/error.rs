use simplegame_render::SurfaceError;

/// Errors returned by the runner.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    #[error("frame rate must be positive, got {0}")]
    InvalidFps(u32),
    #[error("game state failed: {0:#}")]
    State(anyhow::Error),
    #[error(transparent)]
    Surface(#[from] SurfaceError),
}
