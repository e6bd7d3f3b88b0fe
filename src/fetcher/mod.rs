// Source adapters: one module per job board behind the JobFetcher trait.

pub mod adzuna;
pub mod arbeitnow;
pub mod careerjet;
pub mod himalayas;
pub mod http;
pub mod remoteok;
pub mod remotive;
pub mod traits;

pub use adzuna::AdzunaFetcher;
pub use arbeitnow::ArbeitnowFetcher;
pub use careerjet::CareerjetFetcher;
pub use himalayas::HimalayasFetcher;
pub use remoteok::RemoteOkFetcher;
pub use remotive::RemotiveFetcher;
pub use traits::JobFetcher;

use serde_json::Value;

/// Boards send ids as numbers or strings; both become the stored external id.
pub(crate) fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
