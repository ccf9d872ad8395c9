//! # ミドルウェア
//!
//! API サーバー用のミドルウェアを提供する。

mod auth;

pub use auth::{AuthState, AuthenticatedUser, require_auth};
