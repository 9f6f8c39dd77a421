use tempmod_application::ports::outgoing::kv_store::StoragePartition;

#[derive(Clone)]
pub struct RedisKeyBuilder {
    namespace: String,
}

impl RedisKeyBuilder {
    pub fn new(root_namespace: &str, environment: &str) -> Self {
        Self {
            namespace: format!("{}:{}:kv:v1", root_namespace, environment),
        }
    }

    pub fn blob_key(&self, partition: StoragePartition, key: &str) -> String {
        format!("{}:{}:{}", self.namespace, partition.as_str(), key)
    }
}
