pub mod http;
pub mod stub;

pub use http::HttpClassifier;
pub use stub::StubClassifier;
