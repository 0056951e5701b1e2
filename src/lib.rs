pub mod api; // HTTP router + server lifecycle
pub mod config;
pub mod describe; // rule-based + model-backed description pipeline
pub mod generate; // text-generation backends (Ollama, mock, optional ONNX)
