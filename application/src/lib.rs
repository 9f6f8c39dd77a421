#[cfg(any(
    feature = "adapters",
    feature = "axum",
    feature = "deadpool-redis",
    feature = "reqwest"
))]
compile_error!("application must not depend on adapters/framework crates");

pub mod error;
pub mod history;
pub mod infrastructure_config;
pub mod ports;
pub mod storage;
pub mod store;
pub mod temp_state;

#[cfg(test)]
pub(crate) mod test_support;
