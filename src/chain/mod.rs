pub mod source;

pub use source::{PoolDataSource, RpcPoolDataSource, MAX_BATCH_SIZE};

#[cfg(test)]
pub use source::MockPoolDataSource;
