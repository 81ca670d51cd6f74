//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&SqlitePool` as the first argument.

pub mod result_movie_repo;
pub mod search_request_repo;

pub use result_movie_repo::ResultMovieRepo;
pub use search_request_repo::SearchRequestRepo;
