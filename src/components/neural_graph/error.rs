use thiserror::Error;

/// Failures inside the engine. None of them leave the component; they are
/// logged and the canvas simply stays blank.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
	/// The canvas has no 2d context, or no host container to size it from.
	#[error("2d drawing surface unavailable")]
	SurfaceUnavailable,
	/// The observed container left the document while a resize was pending.
	#[error("container detached during resize")]
	ResizeRace,
	/// `requestAnimationFrame` refused the callback.
	#[error("could not schedule animation frame")]
	Schedule,
	/// The browser would not construct a `ResizeObserver`.
	#[error("could not observe container size")]
	Observer,
}
