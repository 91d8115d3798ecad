//! UseCase 層
//!
//! ビジネスロジックを実装するレイヤー。
//! UI 層（HTTP / WebSocket ハンドラ）やクライアントのローカルバックエンドから呼び出され、
//! Domain 層を操作します。

pub mod append_record;
pub mod error;
pub mod get_record;
pub mod list_records;
pub mod remove_record;
pub mod resolve_session;
pub mod sign_in;

pub use append_record::AppendRecordUseCase;
pub use error::{AppendRecordError, ReadRecordError, RemoveRecordError, SessionError, SignInError};
pub use get_record::GetRecordUseCase;
pub use list_records::ListRecordsUseCase;
pub use remove_record::RemoveRecordUseCase;
pub use resolve_session::ResolveSessionUseCase;
pub use sign_in::{SignInMethod, SignInUseCase};
