pub mod keys;
pub mod kv_store_redis;
