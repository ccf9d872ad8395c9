//! # ブログ
//!
//! ブログ投稿エンティティとそれに関連する値オブジェクトを定義する。
//!
//! | 型 | 用途 |
//! |---|------|
//! | [`Blog`] | ブログ投稿 |
//! | [`BlogTitle`] / [`BlogUrl`] | 必須の文字列フィールド |
//! | [`Likes`] | いいね数（0 以上） |
//! | [`BlogChanges`] | 更新時の差分（未指定フィールドは現状維持） |

use crate::{DomainError, user::UserId};

define_uuid_id! {
    /// ブログ ID
    pub struct BlogId;
}

define_validated_string! {
    /// ブログのタイトル
    pub struct BlogTitle {
        model: "Blog",
        path: "title",
        min_length: 1,
        max_length: 300,
    }
}

define_validated_string! {
    /// ブログの URL
    ///
    /// 形式は検証しない（任意の文字列を許容する既存データとの互換性のため）。
    pub struct BlogUrl {
        model: "Blog",
        path: "url",
        min_length: 1,
        max_length: 2048,
    }
}

/// いいね数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Likes(u64);

impl Likes {
    /// 入力値からいいね数を作成する
    ///
    /// JSON の数値は符号付きで受け取り、負数はバリデーションエラーにする。
    pub fn new(value: i64) -> Result<Self, DomainError> {
        u64::try_from(value).map(Self).map_err(|_| {
            DomainError::Validation(format!(
                "Blog validation failed: likes: Path `likes` ({value}) is less than minimum \
                 allowed value (0)."
            ))
        })
    }

    /// 未指定は 0 とする
    pub fn or_default(value: Option<i64>) -> Result<Self, DomainError> {
        value.map_or(Ok(Self::default()), Self::new)
    }

    pub fn from_stored(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

/// ブログ更新の差分
///
/// `None` のフィールドは現状維持。作成者は変更できない。
#[derive(Debug, Clone, Default)]
pub struct BlogChanges {
    pub title:  Option<BlogTitle>,
    pub author: Option<String>,
    pub url:    Option<BlogUrl>,
    pub likes:  Option<Likes>,
}

/// ブログエンティティ
///
/// # 不変条件
///
/// - `title` と `url` は空でない
/// - `user_id` は作成後に変わらない（`None` は作成者なしで登録されたデータ）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blog {
    id:      BlogId,
    title:   BlogTitle,
    author:  Option<String>,
    url:     BlogUrl,
    likes:   Likes,
    user_id: Option<UserId>,
}

impl Blog {
    pub fn new(
        id: BlogId,
        title: BlogTitle,
        author: Option<String>,
        url: BlogUrl,
        likes: Likes,
        user_id: Option<UserId>,
    ) -> Self {
        Self {
            id,
            title,
            author,
            url,
            likes,
            user_id,
        }
    }

    pub fn id(&self) -> &BlogId {
        &self.id
    }

    pub fn title(&self) -> &BlogTitle {
        &self.title
    }

    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    pub fn url(&self) -> &BlogUrl {
        &self.url
    }

    pub fn likes(&self) -> Likes {
        self.likes
    }

    pub fn user_id(&self) -> Option<&UserId> {
        self.user_id.as_ref()
    }

    /// 差分を適用した新しいインスタンスを返す
    pub fn apply(self, changes: BlogChanges) -> Self {
        Self {
            id:      self.id,
            title:   changes.title.unwrap_or(self.title),
            author:  changes.author.or(self.author),
            url:     changes.url.unwrap_or(self.url),
            likes:   changes.likes.unwrap_or(self.likes),
            user_id: self.user_id,
        }
    }

    /// 指定ユーザーが削除してよいかを検証する
    ///
    /// 作成者のみ削除できる。作成者なしのブログは誰も削除できない。
    pub fn ensure_deletable_by(&self, user_id: &UserId) -> Result<(), DomainError> {
        match &self.user_id {
            Some(owner) if owner == user_id => Ok(()),
            _ => Err(DomainError::Forbidden(
                "only the creator can delete a blog".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn sample_blog(user_id: Option<UserId>) -> Blog {
        Blog::new(
            BlogId::new(),
            BlogTitle::new("title1").unwrap(),
            Some("author1".to_string()),
            BlogUrl::new("url1").unwrap(),
            Likes::new(32).unwrap(),
            user_id,
        )
    }

    #[rstest]
    fn test_タイトル未入力は必須エラー() {
        let err = BlogTitle::required(None).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Blog validation failed: title: Path `title` is required."
        );
    }

    #[rstest]
    fn test_url未入力は必須エラー() {
        let err = BlogUrl::new("  ").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Blog validation failed: url: Path `url` is required."
        );
    }

    #[rstest]
    #[case(None, 0)]
    #[case(Some(0), 0)]
    #[case(Some(31), 31)]
    fn test_いいね数の既定値は0(#[case] input: Option<i64>, #[case] expected: u64) {
        assert_eq!(Likes::or_default(input).unwrap().value(), expected);
    }

    #[rstest]
    fn test_いいね数が負数はエラー() {
        let err = Likes::new(-1).unwrap_err();
        assert!(matches!(err, DomainError::Validation(msg) if msg.contains("likes")));
    }

    #[rstest]
    fn test_applyで指定フィールドのみ更新される() {
        let owner = UserId::new();
        let blog = sample_blog(Some(owner));
        let id = *blog.id();

        let updated = blog.apply(BlogChanges {
            likes: Some(Likes::new(33).unwrap()),
            ..Default::default()
        });

        assert_eq!(updated.id(), &id);
        assert_eq!(updated.title().as_str(), "title1");
        assert_eq!(updated.author(), Some("author1"));
        assert_eq!(updated.likes().value(), 33);
        assert_eq!(updated.user_id(), Some(&owner));
    }

    #[rstest]
    fn test_作成者は削除できる() {
        let owner = UserId::new();
        let blog = sample_blog(Some(owner));

        assert!(blog.ensure_deletable_by(&owner).is_ok());
    }

    #[rstest]
    fn test_作成者以外は削除できない() {
        let blog = sample_blog(Some(UserId::new()));

        let err = blog.ensure_deletable_by(&UserId::new()).unwrap_err();

        assert_eq!(
            err,
            DomainError::Forbidden("only the creator can delete a blog".to_string())
        );
    }

    #[rstest]
    fn test_作成者なしのブログは誰も削除できない() {
        let blog = sample_blog(None);

        assert!(blog.ensure_deletable_by(&UserId::new()).is_err());
    }
}
