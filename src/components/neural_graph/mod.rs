mod animation;
mod builder;
mod component;
mod config;
mod error;
mod observer;
mod physics;
mod render;
mod types;

pub use component::NeuralGraphCanvas;
