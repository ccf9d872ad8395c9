//! # UserRepository
//!
//! ユーザーの永続化を担当するリポジトリ。
//!
//! ## 設計方針
//!
//! - **ユーザー名の一意性**: `{prefix}_usernames` テーブルにユーザー名をキーとしたアイテムを置き、
//!   ユーザー本体と同じトランザクションで `attribute_not_exists` 条件付きで書き込む
//! - **ブログ一覧**: 文字列セット（SS）で保持し、`ADD` / `DELETE` で更新する
//!   （空集合は保存できないため、ブログがなければ属性自体を持たない）

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::{
   Client,
   operation::transact_write_items::TransactWriteItemsError,
   types::{AttributeValue, Put, TransactWriteItem},
};
use bloglist_domain::{
   blog::BlogId,
   password::PasswordHash,
   user::{User, UserId, Username},
};

use crate::{
   dynamodb::{self, Item, TableNames, get_opt_s, get_s, get_ss, parse_id},
   error::InfraError,
};

/// ユーザーリポジトリトレイト
///
/// ユーザー情報の永続化操作を定義する。
/// インフラ層で具体的な実装を提供し、ユースケース層から利用する。
#[async_trait]
pub trait UserRepository: Send + Sync {
   /// ユーザーを登録する
   ///
   /// # 戻り値
   ///
   /// - `Ok(())`: 登録成功
   /// - `Err(_)`: ユーザー名が既に使われている場合は Conflict、それ以外はデータベースエラー
   async fn insert(&self, user: &User) -> Result<(), InfraError>;

   /// ID でユーザーを検索
   async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, InfraError>;

   /// ユーザー名でユーザーを検索
   async fn find_by_username(&self, username: &Username) -> Result<Option<User>, InfraError>;

   /// 全ユーザーを ID 昇順で取得
   async fn find_all(&self) -> Result<Vec<User>, InfraError>;

   /// ユーザーのブログ一覧にブログを追加する
   async fn add_blog(&self, user_id: &UserId, blog_id: &BlogId) -> Result<(), InfraError>;

   /// ユーザーのブログ一覧からブログを取り除く
   async fn remove_blog(&self, user_id: &UserId, blog_id: &BlogId) -> Result<(), InfraError>;

   /// 全ユーザーを削除する（テスト用リセット）
   async fn delete_all(&self) -> Result<(), InfraError>;
}

/// DynamoDB 実装の UserRepository
#[derive(Debug, Clone)]
pub struct DynamoDbUserRepository {
   client:          Client,
   users_table:     String,
   usernames_table: String,
}

impl DynamoDbUserRepository {
   pub fn new(client: Client, tables: &TableNames) -> Self {
      Self {
         client,
         users_table: tables.users.clone(),
         usernames_table: tables.usernames.clone(),
      }
   }

   async fn update_blogs(
      &self,
      expression: &str,
      user_id: &UserId,
      blog_id: &BlogId,
   ) -> Result<(), InfraError> {
      self
         .client
         .update_item()
         .table_name(&self.users_table)
         .key("id", AttributeValue::S(user_id.to_string()))
         .update_expression(expression)
         .expression_attribute_names("#blogs", "blogs")
         .expression_attribute_values(":b", AttributeValue::Ss(vec![blog_id.to_string()]))
         .send()
         .await
         .map_err(|e| InfraError::dynamo_db(format!("ユーザーのブログ一覧の更新に失敗: {e}")))?;

      Ok(())
   }
}

#[async_trait]
impl UserRepository for DynamoDbUserRepository {
   #[tracing::instrument(skip_all, level = "debug", fields(user_id = %user.id()))]
   async fn insert(&self, user: &User) -> Result<(), InfraError> {
      let put_user = Put::builder()
         .table_name(&self.users_table)
         .set_item(Some(user_to_item(user)))
         .condition_expression("attribute_not_exists(id)")
         .build()
         .map_err(|e| InfraError::dynamo_db(format!("Put 構築エラー: {e}")))?;

      let put_username = Put::builder()
         .table_name(&self.usernames_table)
         .item("username", AttributeValue::S(user.username().to_string()))
         .item("user_id", AttributeValue::S(user.id().to_string()))
         .condition_expression("attribute_not_exists(username)")
         .build()
         .map_err(|e| InfraError::dynamo_db(format!("Put 構築エラー: {e}")))?;

      let result = self
         .client
         .transact_write_items()
         .transact_items(TransactWriteItem::builder().put(put_user).build())
         .transact_items(TransactWriteItem::builder().put(put_username).build())
         .send()
         .await;

      if let Err(err) = result {
         // 2 番目（ユーザー名アイテム）の条件が失敗した場合のみ一意制約違反
         if let Some(TransactWriteItemsError::TransactionCanceledException(canceled)) =
            err.as_service_error()
         {
            let username_taken = canceled
               .cancellation_reasons()
               .get(1)
               .and_then(|reason| reason.code())
               == Some("ConditionalCheckFailed");
            if username_taken {
               return Err(InfraError::conflict("User", user.username().as_str()));
            }
         }
         return Err(InfraError::dynamo_db(format!("ユーザーの登録に失敗: {err}")));
      }

      Ok(())
   }

   #[tracing::instrument(skip_all, level = "debug", fields(%id))]
   async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, InfraError> {
      let output = self
         .client
         .get_item()
         .table_name(&self.users_table)
         .key("id", AttributeValue::S(id.to_string()))
         .consistent_read(true)
         .send()
         .await
         .map_err(|e| InfraError::dynamo_db(format!("ユーザーの取得に失敗: {e}")))?;

      output.item().map(item_to_user).transpose()
   }

   #[tracing::instrument(skip_all, level = "debug")]
   async fn find_by_username(&self, username: &Username) -> Result<Option<User>, InfraError> {
      let output = self
         .client
         .get_item()
         .table_name(&self.usernames_table)
         .key("username", AttributeValue::S(username.to_string()))
         .consistent_read(true)
         .send()
         .await
         .map_err(|e| InfraError::dynamo_db(format!("ユーザー名の検索に失敗: {e}")))?;

      let Some(item) = output.item() else {
         return Ok(None);
      };

      let user_id: UserId = parse_id(&get_s(item, "user_id")?, "user_id")?;
      self.find_by_id(&user_id).await
   }

   #[tracing::instrument(skip_all, level = "debug")]
   async fn find_all(&self) -> Result<Vec<User>, InfraError> {
      let items = dynamodb::scan_all(&self.client, &self.users_table).await?;

      let mut users = items
         .iter()
         .map(item_to_user)
         .collect::<Result<Vec<_>, _>>()?;
      users.sort_by(|a, b| a.id().cmp(b.id()));

      Ok(users)
   }

   #[tracing::instrument(skip_all, level = "debug", fields(%user_id, %blog_id))]
   async fn add_blog(&self, user_id: &UserId, blog_id: &BlogId) -> Result<(), InfraError> {
      self.update_blogs("ADD #blogs :b", user_id, blog_id).await
   }

   #[tracing::instrument(skip_all, level = "debug", fields(%user_id, %blog_id))]
   async fn remove_blog(&self, user_id: &UserId, blog_id: &BlogId) -> Result<(), InfraError> {
      self.update_blogs("DELETE #blogs :b", user_id, blog_id).await
   }

   #[tracing::instrument(skip_all, level = "debug")]
   async fn delete_all(&self) -> Result<(), InfraError> {
      dynamodb::delete_all_items(&self.client, &self.usernames_table, "username").await?;
      dynamodb::delete_all_items(&self.client, &self.users_table, "id").await?;
      Ok(())
   }
}

fn user_to_item(user: &User) -> Item {
   let mut item = HashMap::new();
   item.insert("id".to_string(), AttributeValue::S(user.id().to_string()));
   item.insert(
      "username".to_string(),
      AttributeValue::S(user.username().to_string()),
   );
   item.insert(
      "password_hash".to_string(),
      AttributeValue::S(user.password_hash().as_str().to_string()),
   );

   if let Some(name) = user.name() {
      item.insert("name".to_string(), AttributeValue::S(name.to_string()));
   }

   if !user.blogs().is_empty() {
      item.insert(
         "blogs".to_string(),
         AttributeValue::Ss(user.blogs().iter().map(ToString::to_string).collect()),
      );
   }

   item
}

fn item_to_user(item: &Item) -> Result<User, InfraError> {
   let id: UserId = parse_id(&get_s(item, "id")?, "id")?;
   let username = Username::new(get_s(item, "username")?)
      .map_err(|e| InfraError::invalid_data(format!("ユーザー名が不正: {e}")))?;
   let blogs = get_ss(item, "blogs")
      .iter()
      .map(|raw| parse_id::<BlogId>(raw, "blogs"))
      .collect::<Result<Vec<_>, _>>()?;

   Ok(User::from_db(
      id,
      username,
      get_opt_s(item, "name"),
      PasswordHash::new(get_s(item, "password_hash")?),
      blogs,
   ))
}

#[cfg(test)]
mod tests {
   use pretty_assertions::assert_eq;

   use super::*;

   fn user_with_blogs(blogs: Vec<BlogId>) -> User {
      User::from_db(
         UserId::new(),
         Username::new("mluukkai").unwrap(),
         Some("Matti Luukkainen".to_string()),
         PasswordHash::new("$argon2id$dummy"),
         blogs,
      )
   }

   #[test]
   fn test_ブログなしのユーザーはblogs属性を持たない() {
      let item = user_to_item(&user_with_blogs(vec![]));

      assert!(!item.contains_key("blogs"));
   }

   #[test]
   fn test_アイテムからユーザーを復元できる() {
      let user = user_with_blogs(vec![BlogId::new(), BlogId::new()]);

      let restored = item_to_user(&user_to_item(&user)).unwrap();

      assert_eq!(restored, user);
   }

   #[test]
   fn test_名前なしのユーザーを復元できる() {
      let user = User::new(
         UserId::new(),
         Username::new("hellas").unwrap(),
         None,
         PasswordHash::new("$argon2id$dummy"),
      );

      let restored = item_to_user(&user_to_item(&user)).unwrap();

      assert_eq!(restored.name(), None);
   }

   #[test]
   fn test_不正なidのアイテムはエラー() {
      let mut item = user_to_item(&user_with_blogs(vec![]));
      item.insert("id".to_string(), AttributeValue::S("broken".to_string()));

      assert!(item_to_user(&item).is_err());
   }
}
