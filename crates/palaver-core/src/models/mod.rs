pub mod chat_request;
pub mod turn;
