//! # パスワード
//!
//! パスワード関連の値オブジェクトを定義する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 用途 |
//! |---|------------|------|
//! | [`PlainPassword`] | 平文パスワード | 登録・ログイン時の入力値 |
//! | [`PasswordHash`] | パスワードハッシュ | 永続化用のハッシュ値 |
//! | [`PasswordVerifyResult`] | 検証結果 | パスワード検証の成否 |

use crate::DomainError;

/// パスワードの最小文字数
pub const MIN_PASSWORD_LENGTH: usize = 3;

/// 平文パスワード
///
/// Debug 出力ではパスワードの値をマスクする。
#[derive(Clone)]
pub struct PlainPassword(String);

impl std::fmt::Debug for PlainPassword {
   fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
      f.debug_tuple("PlainPassword").field(&"[REDACTED]").finish()
   }
}

impl PlainPassword {
   /// 検証なしでパスワードを作成する（ログイン時の入力値）
   pub fn new(value: impl Into<String>) -> Self {
      Self(value.into())
   }

   /// ユーザー登録用のパスワードを作成する
   ///
   /// # バリデーション
   ///
   /// - 未入力（`None`）は不可
   /// - [`MIN_PASSWORD_LENGTH`] 文字以上
   ///
   /// ユーザー名の検証より先に行う（既存クライアントが期待する順序）。
   pub fn for_registration(value: Option<String>) -> Result<Self, DomainError> {
      let Some(value) = value else {
         return Err(DomainError::Validation("Password is required.".to_string()));
      };

      if value.chars().count() < MIN_PASSWORD_LENGTH {
         return Err(DomainError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters long."
         )));
      }

      Ok(Self(value))
   }

   /// 文字列参照を取得する
   pub fn as_str(&self) -> &str {
      &self.0
   }
}

/// パスワードハッシュ（永続化用）
///
/// Argon2id の PHC 文字列をラップする。
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl std::fmt::Debug for PasswordHash {
   fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
      f.debug_tuple("PasswordHash").field(&"[REDACTED]").finish()
   }
}

impl PasswordHash {
   /// ハッシュ文字列からインスタンスを作成する
   pub fn new(hash: impl Into<String>) -> Self {
      Self(hash.into())
   }

   /// 文字列参照を取得する
   pub fn as_str(&self) -> &str {
      &self.0
   }
}

/// パスワード検証結果
///
/// bool ではなく専用の型を使うことで、意図が明確になる。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordVerifyResult {
   Match,
   Mismatch,
}

impl PasswordVerifyResult {
   pub fn is_match(&self) -> bool {
      matches!(self, Self::Match)
   }

   pub fn is_mismatch(&self) -> bool {
      matches!(self, Self::Mismatch)
   }
}

impl From<bool> for PasswordVerifyResult {
   fn from(matched: bool) -> Self {
      if matched { Self::Match } else { Self::Mismatch }
   }
}
