mod builders;
mod table;

pub use builders::{grid_from_rows, render_grid};
pub use table::{TestTable, open_engine};

/// Route engine logs to the test writer. Filter with `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
