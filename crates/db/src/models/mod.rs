pub mod result_movie;
pub mod search_request;
