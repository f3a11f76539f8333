// Cluster Domain Types

/// Integer classification produced by the external prediction service.
/// Resolved per request, never cached here.
pub type ClusterLabel = i32;

/// User identifier sent to the prediction service
pub type UserId = i64;
