/// UUID v7 ベースの ID 型を定義する宣言型マクロ
///
/// 以下のボイラープレートを一括生成する:
/// - Newtype 構造体（`Uuid` をラップ）
/// - `derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display)`
/// - `new()`: UUID v7 を生成
/// - `from_uuid()` / `as_uuid()`
/// - `FromStr`: 不正な文字列は `DomainError::MalformedId`
/// - `Default` impl（`new()` に委譲）
///
/// UUID v7 は時刻順にソートされるため、`Ord` がそのまま作成順になる。
///
/// # 使用例
///
/// ```rust
/// use bloglist_domain::blog::BlogId;
///
/// let id = BlogId::new();
/// let restored: BlogId = id.to_string().parse().unwrap();
/// assert_eq!(id, restored);
/// assert!("not-a-uuid".parse::<BlogId>().is_err());
/// ```
macro_rules! define_uuid_id {
    (
        $(#[$meta:meta])*
        $vis:vis struct $Name:ident;
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
            serde::Serialize, serde::Deserialize,
            derive_more::Display,
        )]
        #[display("{_0}")]
        #[serde(transparent)]
        $vis struct $Name(uuid::Uuid);

        impl $Name {
            /// 新しい ID を生成する（UUID v7）
            pub fn new() -> Self {
                Self(uuid::Uuid::now_v7())
            }

            /// 既存の UUID から ID を作成する
            pub fn from_uuid(uuid: uuid::Uuid) -> Self {
                Self(uuid)
            }

            /// 内部の UUID 参照を取得する
            pub fn as_uuid(&self) -> &uuid::Uuid {
                &self.0
            }
        }

        impl Default for $Name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::str::FromStr for $Name {
            type Err = $crate::DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                uuid::Uuid::parse_str(s)
                    .map(Self)
                    .map_err(|_| $crate::DomainError::MalformedId)
            }
        }
    };
}

/// バリデーション付き String Newtype を定義する宣言型マクロ
///
/// 以下のボイラープレートを一括生成する:
/// - Newtype 構造体（`String` をラップ）
/// - `new()`: trim + 必須チェック + 最小長 / 最大長チェック
/// - `as_str()`
/// - `Display`
///
/// エラーメッセージは `<model> validation failed: <path>: ...` 形式で、
/// 既存クライアントが部分一致で参照している文言に揃える。
///
/// # 引数
///
/// - `model`: エンティティ名（例: `"User"`）
/// - `path`: フィールド名（例: `"username"`）
/// - `min_length` / `max_length`: 文字数（`chars().count()` でカウント）
macro_rules! define_validated_string {
    (
        $(#[$meta:meta])*
        $vis:vis struct $Name:ident {
            model: $model:expr,
            path: $path:expr,
            min_length: $min_length:expr,
            max_length: $max_length:expr $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, PartialEq, Eq,
            serde::Serialize, serde::Deserialize,
        )]
        #[serde(transparent)]
        $vis struct $Name(String);

        impl $Name {
            pub fn new(value: impl Into<String>) -> Result<Self, $crate::DomainError> {
                let value = value.into().trim().to_string();

                if value.is_empty() {
                    return Err($crate::DomainError::Validation(format!(
                        "{} validation failed: {}: Path `{}` is required.",
                        $model, $path, $path
                    )));
                }

                let length = value.chars().count();
                if length < $min_length {
                    return Err($crate::DomainError::Validation(format!(
                        "{} validation failed: {}: Path `{}` (`{}`) is shorter than the minimum allowed length ({}).",
                        $model, $path, $path, value, $min_length
                    )));
                }

                if length > $max_length {
                    return Err($crate::DomainError::Validation(format!(
                        "{} validation failed: {}: Path `{}` is longer than the maximum allowed length ({}).",
                        $model, $path, $path, $max_length
                    )));
                }

                Ok(Self(value))
            }

            /// 未入力（`None`）も必須エラーとして扱う
            pub fn required(value: Option<String>) -> Result<Self, $crate::DomainError> {
                Self::new(value.unwrap_or_default())
            }

            /// 文字列参照を取得する
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $Name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}
