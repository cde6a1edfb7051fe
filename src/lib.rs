//! Data preparation glue for training a summarization model on the
//! Reddit TIFU corpus: loading and splitting the dataset, padded
//! batch construction, and learning-rate schedule selection.

pub mod application;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod infra;
pub mod ml;

pub use data::batcher::batch_by_instances;
pub use data::dataloader::create_data_loader;
pub use data::reddit::load_reddit;
pub use data::splitter::split_data;
pub use error::PrepError;
pub use ml::scheduler::init_schedule;
