pub mod aggregate_request;
pub mod aggregate_response;
pub mod capabilities_response;
pub mod columns_response;
pub mod error_response;
pub mod rows_request;
pub mod rows_response;
