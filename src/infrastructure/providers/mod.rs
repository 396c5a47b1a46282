pub mod roboflow;
pub mod traits;

pub use roboflow::RoboflowProvider;
pub use traits::{DetectionProvider, ProviderDetection, ProviderError};
