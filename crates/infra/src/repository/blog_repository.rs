//! # BlogRepository
//!
//! ブログの永続化を担当するリポジトリ。
//!
//! 作成者は `user_id` 属性に ID のみを保持する。作成者情報の結合はユースケース層で行う。

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::{Client, operation::put_item::PutItemError, types::AttributeValue};
use bloglist_domain::{
   blog::{Blog, BlogId, BlogTitle, BlogUrl, Likes},
   user::UserId,
};

use crate::{
   dynamodb::{self, Item, TableNames, get_opt_s, get_s, get_u64, parse_id},
   error::InfraError,
};

/// ブログリポジトリトレイト
#[async_trait]
pub trait BlogRepository: Send + Sync {
   /// ブログを登録する
   async fn insert(&self, blog: &Blog) -> Result<(), InfraError>;

   /// ID でブログを検索
   async fn find_by_id(&self, id: &BlogId) -> Result<Option<Blog>, InfraError>;

   /// 全ブログを ID 昇順（= 作成順）で取得
   async fn find_all(&self) -> Result<Vec<Blog>, InfraError>;

   /// 既存のブログを置き換える
   ///
   /// # 戻り値
   ///
   /// - `Ok(true)`: 更新成功
   /// - `Ok(false)`: ブログが存在しない
   async fn update(&self, blog: &Blog) -> Result<bool, InfraError>;

   /// ブログを削除する（存在しなくてもエラーにしない）
   async fn delete(&self, id: &BlogId) -> Result<(), InfraError>;

   /// 全ブログを削除する（テスト用リセット）
   async fn delete_all(&self) -> Result<(), InfraError>;
}

/// DynamoDB 実装の BlogRepository
#[derive(Debug, Clone)]
pub struct DynamoDbBlogRepository {
   client:     Client,
   table_name: String,
}

impl DynamoDbBlogRepository {
   pub fn new(client: Client, tables: &TableNames) -> Self {
      Self {
         client,
         table_name: tables.blogs.clone(),
      }
   }
}

#[async_trait]
impl BlogRepository for DynamoDbBlogRepository {
   #[tracing::instrument(skip_all, level = "debug", fields(blog_id = %blog.id()))]
   async fn insert(&self, blog: &Blog) -> Result<(), InfraError> {
      self
         .client
         .put_item()
         .table_name(&self.table_name)
         .set_item(Some(blog_to_item(blog)))
         .condition_expression("attribute_not_exists(id)")
         .send()
         .await
         .map_err(|e| InfraError::dynamo_db(format!("ブログの登録に失敗: {e}")))?;

      Ok(())
   }

   #[tracing::instrument(skip_all, level = "debug", fields(%id))]
   async fn find_by_id(&self, id: &BlogId) -> Result<Option<Blog>, InfraError> {
      let output = self
         .client
         .get_item()
         .table_name(&self.table_name)
         .key("id", AttributeValue::S(id.to_string()))
         .consistent_read(true)
         .send()
         .await
         .map_err(|e| InfraError::dynamo_db(format!("ブログの取得に失敗: {e}")))?;

      output.item().map(item_to_blog).transpose()
   }

   #[tracing::instrument(skip_all, level = "debug")]
   async fn find_all(&self) -> Result<Vec<Blog>, InfraError> {
      let items = dynamodb::scan_all(&self.client, &self.table_name).await?;

      let mut blogs = items
         .iter()
         .map(item_to_blog)
         .collect::<Result<Vec<_>, _>>()?;
      blogs.sort_by(|a, b| a.id().cmp(b.id()));

      Ok(blogs)
   }

   #[tracing::instrument(skip_all, level = "debug", fields(blog_id = %blog.id()))]
   async fn update(&self, blog: &Blog) -> Result<bool, InfraError> {
      let result = self
         .client
         .put_item()
         .table_name(&self.table_name)
         .set_item(Some(blog_to_item(blog)))
         .condition_expression("attribute_exists(id)")
         .send()
         .await;

      match result {
         Ok(_) => Ok(true),
         Err(err)
            if matches!(
               err.as_service_error(),
               Some(PutItemError::ConditionalCheckFailedException(_))
            ) =>
         {
            Ok(false)
         }
         Err(err) => Err(InfraError::dynamo_db(format!("ブログの更新に失敗: {err}"))),
      }
   }

   #[tracing::instrument(skip_all, level = "debug", fields(%id))]
   async fn delete(&self, id: &BlogId) -> Result<(), InfraError> {
      self
         .client
         .delete_item()
         .table_name(&self.table_name)
         .key("id", AttributeValue::S(id.to_string()))
         .send()
         .await
         .map_err(|e| InfraError::dynamo_db(format!("ブログの削除に失敗: {e}")))?;

      Ok(())
   }

   #[tracing::instrument(skip_all, level = "debug")]
   async fn delete_all(&self) -> Result<(), InfraError> {
      dynamodb::delete_all_items(&self.client, &self.table_name, "id").await?;
      Ok(())
   }
}

fn blog_to_item(blog: &Blog) -> Item {
   let mut item = HashMap::new();
   item.insert("id".to_string(), AttributeValue::S(blog.id().to_string()));
   item.insert(
      "title".to_string(),
      AttributeValue::S(blog.title().to_string()),
   );
   item.insert("url".to_string(), AttributeValue::S(blog.url().to_string()));
   item.insert(
      "likes".to_string(),
      AttributeValue::N(blog.likes().value().to_string()),
   );

   if let Some(author) = blog.author() {
      item.insert("author".to_string(), AttributeValue::S(author.to_string()));
   }

   if let Some(user_id) = blog.user_id() {
      item.insert("user_id".to_string(), AttributeValue::S(user_id.to_string()));
   }

   item
}

fn item_to_blog(item: &Item) -> Result<Blog, InfraError> {
   let id: BlogId = parse_id(&get_s(item, "id")?, "id")?;
   let title = BlogTitle::new(get_s(item, "title")?)
      .map_err(|e| InfraError::invalid_data(format!("タイトルが不正: {e}")))?;
   let url = BlogUrl::new(get_s(item, "url")?)
      .map_err(|e| InfraError::invalid_data(format!("URL が不正: {e}")))?;
   let user_id = get_opt_s(item, "user_id")
      .map(|raw| parse_id::<UserId>(&raw, "user_id"))
      .transpose()?;

   Ok(Blog::new(
      id,
      title,
      get_opt_s(item, "author"),
      url,
      Likes::from_stored(get_u64(item, "likes")?),
      user_id,
   ))
}
