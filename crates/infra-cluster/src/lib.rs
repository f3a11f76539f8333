// Jobmatch Infrastructure - Cluster Prediction Service Adapter
// Implements: ClusterResolver over HTTP

mod http_resolver;

pub use http_resolver::HttpClusterResolver;
