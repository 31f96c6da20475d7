pub mod request_id;
pub mod validated_json;

pub use request_id::{make_span_with_request_id, request_id_middleware, RequestId, REQUEST_ID_HEADER};
pub use validated_json::ValidatedJson;
