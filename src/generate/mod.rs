pub mod ollama;
#[cfg(feature = "onnx-generator")]
pub mod local;

pub use ollama::{MockGenerator, OllamaGenerator};
#[cfg(feature = "onnx-generator")]
pub use local::LocalGenerator;
