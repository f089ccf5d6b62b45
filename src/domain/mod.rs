// Domain layer - value types for samples, descriptors and chart lines
pub mod color;
pub mod descriptor;
pub mod line;
pub mod merged;
pub mod sample;
